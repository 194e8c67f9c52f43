//! WordPress export import pipeline
//!
//! Parses a WordPress XML export into normalized post records and drives them
//! through the Content Store, reporting a per-record imported/skipped/errors
//! outcome.
//!
//! # Architecture
//!
//! - **Parser**: streaming XML → `ParsedExport`
//! - **Services**: the orchestrator running the batch
//! - **Handlers**: the multipart upload endpoint
//! - **Plugin**: integration with the Frostline plugin system

pub mod handlers;
pub mod parser;
pub mod plugin;
pub mod services;

pub use parser::{parse_wordpress_export, ExportParseError, ImportedPost, ParsedExport};
pub use plugin::ImportPlugin;
pub use services::{ImportOptions, ImportOrchestrator, ImportOutcome};
