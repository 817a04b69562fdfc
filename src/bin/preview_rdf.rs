//! Preview binary - renders one language's RDF document to stdout without
//! running the server
//!
//! Usage:
//!   cargo run --bin preview -- cym
//!
//! Optional environment variables:
//! - DATABASE_PATH (defaults to data/languages.db)
//! - BASE_URL (defaults to http://localhost:8080)

use anyhow::{bail, Context, Result};

use language_rdf_publisher::config::Config;
use language_rdf_publisher::db::{Database, DbSourceCatalog};
use language_rdf_publisher::rdf;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let id = match std::env::args().nth(1) {
        Some(id) => id,
        None => bail!("Usage: preview <language-id>"),
    };

    let config = Config::from_env()?;
    let db = Database::new(&config.database_path)?;

    let language = db
        .language_by_id(&id)?
        .with_context(|| format!("No language with id {}", id))?;

    let catalog = DbSourceCatalog::new(&db, &config.base_url);
    let document = rdf::language_document(&language, &catalog, &config.base_url)?;

    print!("{}", document);
    Ok(())
}
