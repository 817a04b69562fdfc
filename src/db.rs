use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

use crate::model::{Identifier, LanguageContext, LanguageSummary, SourceRef};
use crate::rdf::{source_url, SourceCatalog};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database connection and create tables
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS language (
                pk INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL UNIQUE,
                latitude REAL CHECK (latitude >= -90 AND latitude <= 90),
                longitude REAL CHECK (longitude >= -180 AND longitude <= 180),
                iso_code TEXT,
                created TEXT NOT NULL,
                updated TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS identifier (
                pk INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                name TEXT NOT NULL,
                lang TEXT,
                created TEXT NOT NULL,
                updated TEXT NOT NULL,
                UNIQUE (type, name, lang)
            );
            CREATE TABLE IF NOT EXISTS language_identifier (
                language_pk INTEGER NOT NULL REFERENCES language(pk),
                identifier_pk INTEGER NOT NULL REFERENCES identifier(pk)
            );
            CREATE TABLE IF NOT EXISTS source (
                pk INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT,
                description TEXT,
                created TEXT NOT NULL,
                updated TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS language_source (
                language_pk INTEGER NOT NULL REFERENCES language(pk),
                source_pk INTEGER NOT NULL REFERENCES source(pk)
            );",
        )
        .context("Failed to create schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a language row, returning its primary key
    pub fn insert_language(
        &self,
        id: &str,
        name: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
        iso_code: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO language (id, name, latitude, longitude, iso_code, created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![id, name, latitude, longitude, iso_code, now],
        )
        .context(format!("Failed to insert language {}", id))?;

        Ok(conn.last_insert_rowid())
    }

    /// Attach an identifier to a language. Identifier rows are shared across
    /// languages; the association row records insertion order.
    pub fn add_identifier(
        &self,
        language_pk: i64,
        kind: &str,
        name: &str,
        lang: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let existing: Option<i64> = conn
            .query_row(
                "SELECT pk FROM identifier WHERE type = ?1 AND name = ?2 AND lang IS ?3",
                params![kind, name, lang],
                |row| row.get(0),
            )
            .optional()?;

        let identifier_pk = match existing {
            Some(pk) => pk,
            None => {
                conn.execute(
                    "INSERT INTO identifier (type, name, lang, created, updated)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![kind, name, lang, now],
                )
                .context(format!("Failed to insert identifier {}", name))?;
                conn.last_insert_rowid()
            }
        };

        conn.execute(
            "INSERT INTO language_identifier (language_pk, identifier_pk) VALUES (?1, ?2)",
            params![language_pk, identifier_pk],
        )
        .context("Failed to link identifier to language")?;

        Ok(identifier_pk)
    }

    /// Insert a source row, reusing an existing row with the same id
    pub fn insert_source(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let existing: Option<i64> = conn
            .query_row(
                "SELECT pk FROM source WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(pk) => Ok(pk),
            None => {
                conn.execute(
                    "INSERT INTO source (id, name, description, created, updated)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![id, name, description, now],
                )
                .context(format!("Failed to insert source {}", id))?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// Record that a source references a language
    pub fn link_source(&self, language_pk: i64, source_pk: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO language_source (language_pk, source_pk) VALUES (?1, ?2)",
            params![language_pk, source_pk],
        )
        .context("Failed to link source to language")?;
        Ok(())
    }

    /// Load one language plus its identifiers, in association insertion order
    pub fn language_by_id(&self, id: &str) -> Result<Option<LanguageContext>> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                "SELECT pk, id, name, latitude, longitude, iso_code FROM language WHERE id = ?1",
                params![id],
                |row| {
                    Ok(LanguageContext {
                        pk: row.get(0)?,
                        id: row.get(1)?,
                        name: row.get(2)?,
                        latitude: row.get(3)?,
                        longitude: row.get(4)?,
                        iso_code: row.get(5)?,
                        identifiers: Vec::new(),
                    })
                },
            )
            .optional()?;

        let mut language = match row {
            Some(language) => language,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(
            "SELECT i.type, i.name, i.lang
             FROM identifier i
             JOIN language_identifier li ON li.identifier_pk = i.pk
             WHERE li.language_pk = ?1
             ORDER BY li.rowid",
        )?;
        language.identifiers = stmt
            .query_map(params![language.pk], |row| {
                Ok(Identifier {
                    kind: row.get(0)?,
                    name: row.get(1)?,
                    lang: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(language))
    }

    /// List all languages for the index view
    pub fn list_languages(&self) -> Result<Vec<LanguageSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name FROM language ORDER BY name")?;

        let languages = stmt
            .query_map([], |row| {
                Ok(LanguageSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(languages)
    }

    /// Load one source by its URL part
    pub fn source_by_id(&self, id: &str) -> Result<Option<SourceRef>> {
        let conn = self.conn.lock().unwrap();
        let source = conn
            .query_row(
                "SELECT pk, id, name, description FROM source WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SourceRef {
                        pk: row.get(0)?,
                        id: row.get(1)?,
                        name: row.get(2)?,
                        description: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(source)
    }

    /// Sources linked to a language through the language_source association.
    /// No ordering is imposed beyond what the join returns.
    pub fn sources_referencing(&self, language_pk: i64) -> Result<Vec<SourceRef>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT s.pk, s.id, s.name, s.description
             FROM source s
             JOIN language_source ls ON ls.source_pk = s.pk
             WHERE ls.language_pk = ?1",
        )?;

        let sources = stmt
            .query_map(params![language_pk], |row| {
                Ok(SourceRef {
                    pk: row.get(0)?,
                    id: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sources)
    }
}

/// [`SourceCatalog`] backed by the live database and the configured base URL.
pub struct DbSourceCatalog<'a> {
    db: &'a Database,
    base_url: &'a str,
}

impl<'a> DbSourceCatalog<'a> {
    pub fn new(db: &'a Database, base_url: &'a str) -> Self {
        Self { db, base_url }
    }
}

impl SourceCatalog for DbSourceCatalog<'_> {
    fn sources_referencing(&self, language_pk: i64) -> Result<Vec<SourceRef>> {
        self.db.sources_referencing(language_pk)
    }

    fn resolve_url(&self, source: &SourceRef) -> String {
        source_url(self.base_url, &source.id)
    }
}
