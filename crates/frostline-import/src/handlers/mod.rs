//! HTTP handlers for WordPress import uploads

pub mod types;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

use crate::parser::parse_wordpress_export;
use crate::services::ImportOptions;
use types::{AppState, ImportResponse};

/// Configure routes for the import API
pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new().route("/imports/wordpress", post(import_wordpress_export))
}

/// Errors surfaced to the upload caller as a JSON envelope
#[derive(Debug, thiserror::Error)]
pub enum ImportApiError {
    #[error("No file provided")]
    NoFile,
    #[error("Invalid multipart upload: {0}")]
    Multipart(String),
    #[error("Uploaded file is not valid UTF-8")]
    InvalidEncoding,
    #[error("Failed to parse WordPress export: {0}")]
    Parse(#[from] crate::parser::ExportParseError),
    #[error("No importable posts found in export")]
    NothingImportable { details: Vec<String> },
}

impl IntoResponse for ImportApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ImportApiError::NothingImportable { details } => {
                json!({ "error": self.to_string(), "details": details })
            }
            ImportApiError::Parse(_) => {
                json!({ "error": self.to_string(), "details": [] })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Import posts from a WordPress XML export
///
/// Accepts a multipart form with the export under `file` and the optional
/// string flags `importAsDraft` and `skipDuplicates` (`"true"` enables them).
#[utoipa::path(
    post,
    path = "/imports/wordpress",
    tag = "Imports",
    request_body(content = String, content_type = "multipart/form-data", description = "Export file plus importAsDraft/skipDuplicates flags"),
    responses(
        (status = 200, description = "Import completed, possibly with per-record errors", body = ImportResponse),
        (status = 400, description = "Missing file or unparseable export"),
    )
)]
async fn import_wordpress_export(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ImportApiError> {
    let mut file_contents: Option<String> = None;
    let mut options = ImportOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportApiError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ImportApiError::Multipart(e.to_string()))?;
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| ImportApiError::InvalidEncoding)?;
                file_contents = Some(text);
            }
            Some("importAsDraft") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ImportApiError::Multipart(e.to_string()))?;
                options.import_as_draft = value == "true";
            }
            Some("skipDuplicates") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ImportApiError::Multipart(e.to_string()))?;
                options.skip_duplicates = value == "true";
            }
            _ => {}
        }
    }

    let xml = file_contents.ok_or(ImportApiError::NoFile)?;

    let export = parse_wordpress_export(&xml)?;

    if export.posts.is_empty() && !export.parse_errors.is_empty() {
        return Err(ImportApiError::NothingImportable {
            details: export.parse_errors,
        });
    }

    info!(
        posts = export.posts.len(),
        parse_errors = export.parse_errors.len(),
        "Parsed WordPress export upload"
    );

    let outcome = state
        .import_orchestrator
        .import_posts(&export, options)
        .await;

    if !outcome.errors.is_empty() {
        error!(errors = outcome.errors.len(), "Import finished with record errors");
    }

    let response = ImportResponse::from_outcome(
        outcome,
        export.categories.into_iter().collect(),
        export.tags.into_iter().collect(),
        export.parse_errors,
    );

    Ok(Json(response))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(import_wordpress_export),
    components(schemas(
        types::ImportResponse,
        types::ImportSummary,
        crate::services::ImportedEntry,
        crate::services::SkippedEntry,
        crate::services::FailedEntry,
    )),
    tags(
        (name = "Imports", description = "Import content from WordPress exports")
    )
)]
pub struct ImportApiDoc;
