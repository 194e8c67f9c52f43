//! Content Store capability for the Frostline catalog and blog
//!
//! The store is the single persistence seam consumed by the import and search
//! services. It is defined as a trait so handlers and orchestrators can be
//! exercised against an in-memory implementation in tests.

mod seaorm;
mod store;

pub mod plugin;
pub mod test_utils;

pub use plugin::ContentPlugin;
pub use seaorm::SeaOrmContentStore;
pub use store::{ContentError, ContentResult, ContentStore, NewPost};
