//! Integration tests for the language RDF publisher
//!
//! These tests exercise the full HTTP surface: the server is started on an
//! ephemeral port with a seeded temporary database and queried over real
//! HTTP.

use std::sync::Arc;

use tempfile::TempDir;

use language_rdf_publisher::config::Config;
use language_rdf_publisher::db::Database;
use language_rdf_publisher::server::{router, AppState};

// ==================== Test Helpers ====================

/// Create a fresh database in a temporary directory
fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test_languages.db");
    let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
    (db, temp_dir)
}

/// Seed the Welsh fixture: coordinates, two name identifiers, an ISO code
/// and one referencing source
fn seed_welsh(db: &Database) -> i64 {
    let pk = db
        .insert_language("cym", "Welsh", Some(52.42), Some(-3.47), Some("cym"))
        .expect("insert language");
    db.add_identifier(pk, "name", "Welsh", Some("en"))
        .expect("add identifier");
    db.add_identifier(pk, "name", "Cymraeg", Some("cy"))
        .expect("add identifier");
    let source_pk = db
        .insert_source("jones2000", Some("Jones 2000"), None)
        .expect("insert source");
    db.link_source(pk, source_pk).expect("link source");
    pk
}

/// Start the server on an ephemeral port and return its base URL
async fn spawn_server(db: Database, database_path: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{}", addr);

    let config = Config {
        database_path,
        base_url: base_url.clone(),
        port: addr.port(),
    };
    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    base_url
}

async fn spawn_seeded_server() -> (String, TempDir) {
    let (db, temp_dir) = create_test_db();
    seed_welsh(&db);
    let database_path = temp_dir
        .path()
        .join("test_languages.db")
        .to_str()
        .unwrap()
        .to_string();
    let base_url = spawn_server(db, database_path).await;
    (base_url, temp_dir)
}

// ==================== Aliveness Tests ====================

#[tokio::test]
async fn test_ping_returns_ok() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/_ping", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "ok");
}

// ==================== RDF Representation Tests ====================

#[tokio::test]
async fn test_language_rdf_representation() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/languages/cym.rdf", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("content-type")
        .expect("content-type header")
        .to_str()
        .expect("header value");
    assert!(
        content_type.starts_with("application/rdf+xml"),
        "unexpected content type {}",
        content_type
    );

    let body = response.text().await.expect("body");

    // Envelope and subject
    assert!(body.contains("<rdf:RDF"));
    assert!(body.contains(&format!(
        r#"<rdf:Description rdf:about="{}/languages/cym">"#,
        base_url
    )));
    assert!(body.contains("<rdfs:label>Welsh</rdfs:label>"));

    // Property block
    assert!(body.contains("<geo:long>-3.47</geo:long>"));
    assert!(body.contains("<geo:lat>52.42</geo:lat>"));
    assert!(body.contains(
        r#"<rdf:type rdf:resource="http://purl.org/dc/terms/LinguisticSystem"/>"#
    ));
    assert!(body.contains(r#"<skos:altLabel xml:lang="cy">Cymraeg</skos:altLabel>"#));
    assert!(
        !body.contains(">Welsh</skos:altLabel>"),
        "the canonical name must not appear as an alternate label"
    );
    assert!(body.contains(&format!(
        r#"<dcterms:isReferencedBy rdf:resource="{}/sources/jones2000"/>"#,
        base_url
    )));
    assert!(body.contains(">cym</lexvo:iso639P3PCode>"));
}

#[tokio::test]
async fn test_language_rdf_without_optional_fields() {
    let (db, temp_dir) = create_test_db();
    db.insert_language("und", "Undetermined", None, None, None)
        .expect("insert");
    let database_path = temp_dir
        .path()
        .join("test_languages.db")
        .to_str()
        .unwrap()
        .to_string();
    let base_url = spawn_server(db, database_path).await;

    let body = reqwest::get(format!("{}/languages/und.rdf", base_url))
        .await
        .expect("request")
        .text()
        .await
        .expect("body");

    // Only the unconditional pieces survive
    assert!(body.contains("LinguisticSystem"));
    assert!(!body.contains("<geo:"));
    assert!(!body.contains("<skos:altLabel"));
    assert!(!body.contains("<dcterms:isReferencedBy"));
    assert!(!body.contains("iso639P3PCode"));
}

// ==================== JSON Representation Tests ====================

#[tokio::test]
async fn test_language_json_representation() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/languages/cym", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["id"], "cym");
    assert_eq!(body["name"], "Welsh");
    assert_eq!(body["iso_code"], "cym");
    assert_eq!(body["identifiers"].as_array().expect("identifiers").len(), 2);
    assert_eq!(body["identifiers"][1]["name"], "Cymraeg");
    assert_eq!(body["identifiers"][1]["type"], "name");
}

#[tokio::test]
async fn test_language_json_extension_matches_bare_id() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let bare: serde_json::Value = reqwest::get(format!("{}/languages/cym", base_url))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    let suffixed: serde_json::Value = reqwest::get(format!("{}/languages/cym.json", base_url))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    assert_eq!(bare, suffixed);
}

#[tokio::test]
async fn test_language_index_lists_languages() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let body: serde_json::Value = reqwest::get(format!("{}/languages", base_url))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    let languages = body.as_array().expect("array");
    assert_eq!(languages.len(), 1);
    assert_eq!(languages[0]["id"], "cym");
    assert_eq!(languages[0]["name"], "Welsh");
}

#[tokio::test]
async fn test_source_json_representation() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/sources/jones2000", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["id"], "jones2000");
    assert_eq!(body["name"], "Jones 2000");
}

// ==================== Error Handling Tests ====================

#[tokio::test]
async fn test_unknown_language_returns_404() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/languages/xyz.rdf", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unknown_extension_returns_404() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/languages/cym.html", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unknown_source_returns_404() {
    let (base_url, _temp_dir) = spawn_seeded_server().await;

    let response = reqwest::get(format!("{}/sources/missing", base_url))
        .await
        .expect("request");
    assert_eq!(response.status(), 404);
}
