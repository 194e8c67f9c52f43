//! Business logic for the import pipeline

mod orchestrator;

pub use orchestrator::{
    FailedEntry, ImportOptions, ImportOrchestrator, ImportOutcome, ImportedEntry, SkippedEntry,
    DEFAULT_AUTHOR,
};
