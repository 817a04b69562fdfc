//! Import binary - loads a JSON dataset file into the language database
//!
//! Usage:
//!   cargo run --bin import -- data/languages.json
//!
//! Optional environment variables:
//! - DATABASE_PATH (defaults to data/languages.db)

use anyhow::{bail, Context, Result};
use tracing::info;

use language_rdf_publisher::config::Config;
use language_rdf_publisher::db::Database;
use language_rdf_publisher::model::LanguageRecord;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("Usage: import <dataset.json>"),
    };

    let raw = std::fs::read_to_string(&path)
        .context(format!("Failed to read dataset file {}", path))?;
    let records: Vec<LanguageRecord> =
        serde_json::from_str(&raw).context("Failed to parse dataset file")?;

    let config = Config::from_env()?;
    let db = Database::new(&config.database_path)?;

    for record in &records {
        let language_pk = db.insert_language(
            &record.id,
            &record.name,
            record.latitude,
            record.longitude,
            record.iso_code.as_deref(),
        )?;

        for identifier in &record.identifiers {
            db.add_identifier(
                language_pk,
                &identifier.kind,
                &identifier.name,
                identifier.lang.as_deref(),
            )?;
        }

        for source in &record.sources {
            let source_pk =
                db.insert_source(&source.id, source.name.as_deref(), source.description.as_deref())?;
            db.link_source(language_pk, source_pk)?;
        }

        info!("Imported {} ({})", record.name, record.id);
    }

    info!(
        "✓ Imported {} languages into {}",
        records.len(),
        config.database_path
    );
    Ok(())
}
