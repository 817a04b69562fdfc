use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::config::Config;
use crate::db::{Database, DbSourceCatalog};
use crate::model::{LanguageSummary, SourceRef};
use crate::rdf;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

/// Errors surfaced by resource views
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            ApiError::Internal(err) => {
                error!("request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/_ping", get(ping))
        .route("/languages", get(language_index))
        .route("/languages/:id", get(language_view))
        .route("/sources/:id", get(source_view))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Aliveness check
async fn ping() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Representation of a resource, selected by filename extension
enum Representation {
    Rdf,
    Json,
}

/// Split a raw path segment like "cym.rdf" into the resource id and the
/// requested representation. A bare id defaults to JSON; unknown extensions
/// are rejected.
fn split_extension(raw: &str) -> Option<(&str, Representation)> {
    match raw.rsplit_once('.') {
        None => Some((raw, Representation::Json)),
        Some((id, "rdf")) => Some((id, Representation::Rdf)),
        Some((id, "json")) => Some((id, Representation::Json)),
        Some(_) => None,
    }
}

async fn language_index(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageSummary>>, ApiError> {
    let languages = state.db.list_languages()?;
    Ok(Json(languages))
}

async fn language_view(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Response, ApiError> {
    let (id, representation) = split_extension(&raw).ok_or(ApiError::NotFound)?;
    let language = state.db.language_by_id(id)?.ok_or(ApiError::NotFound)?;

    match representation {
        Representation::Rdf => {
            let catalog = DbSourceCatalog::new(&state.db, &state.config.base_url);
            let document = rdf::language_document(&language, &catalog, &state.config.base_url)?;
            Ok((
                [(header::CONTENT_TYPE, "application/rdf+xml")],
                document,
            )
                .into_response())
        }
        Representation::Json => Ok(Json(language).into_response()),
    }
}

async fn source_view(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<SourceRef>, ApiError> {
    let id = match split_extension(&raw) {
        Some((id, Representation::Json)) => id,
        _ => return Err(ApiError::NotFound),
    };
    let source = state.db.source_by_id(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(source))
}
