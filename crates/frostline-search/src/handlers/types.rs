//! Request and response types for search handlers

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::services::{SearchResult, SearchService};

/// Application state for handlers
pub struct AppState {
    pub search_service: Arc<SearchService>,
}

/// Query parameters for the search endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text query
    #[serde(default)]
    pub q: String,
}

/// Response for a search request
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}
