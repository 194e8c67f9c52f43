//! HTTP handlers for site search

pub mod types;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use crate::services::SearchError;
use types::{AppState, SearchQuery, SearchResponse};

/// Configure routes for the search API
pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new().route("/search", get(search))
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        error!(error = %self, "Search request failed");
        let body = json!({
            "error": self.to_string(),
            "results": [],
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Search machines, categories and blog posts
#[utoipa::path(
    get,
    path = "/search",
    tag = "Search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Merged search results", body = SearchResponse),
        (status = 500, description = "Content store failure"),
    )
)]
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, SearchError> {
    let results = state.search_service.search(&params.q).await?;
    Ok(Json(SearchResponse { results }))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(search),
    components(schemas(types::SearchResponse, crate::services::SearchResult)),
    tags(
        (name = "Search", description = "Site-wide content search")
    )
)]
pub struct SearchApiDoc;
