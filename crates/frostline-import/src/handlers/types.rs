//! Request and response types for import handlers

use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::{FailedEntry, ImportOrchestrator, ImportOutcome, ImportedEntry, SkippedEntry};

/// Application state for handlers
pub struct AppState {
    pub import_orchestrator: Arc<ImportOrchestrator>,
}

/// Count breakdown of a finished import run
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportSummary {
    /// Items parsed as posts
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Response for a completed import upload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    pub summary: ImportSummary,
    pub imported: Vec<ImportedEntry>,
    pub skipped: Vec<SkippedEntry>,
    pub errors: Vec<FailedEntry>,
    /// Category names seen in the export, sorted and deduplicated
    pub categories: Vec<String>,
    /// Tag names seen in the export, sorted and deduplicated
    pub tags: Vec<String>,
    /// Per-item problems that did not abort the parse
    pub parse_errors: Vec<String>,
}

impl ImportResponse {
    pub fn from_outcome(
        outcome: ImportOutcome,
        categories: Vec<String>,
        tags: Vec<String>,
        parse_errors: Vec<String>,
    ) -> Self {
        Self {
            success: outcome.errors.is_empty(),
            summary: ImportSummary {
                total: outcome.total(),
                imported: outcome.imported.len(),
                skipped: outcome.skipped.len(),
                errors: outcome.errors.len(),
            },
            imported: outcome.imported,
            skipped: outcome.skipped,
            errors: outcome.errors,
            categories,
            tags,
            parse_errors,
        }
    }
}
