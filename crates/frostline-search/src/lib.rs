//! Site-wide search across machines, categories and blog posts
//!
//! Fans a single free-text query out to three independent Content Store
//! lookups and merges the hits into one typed result list.

pub mod handlers;
pub mod plugin;
pub mod services;

pub use plugin::SearchPlugin;
pub use services::{SearchError, SearchResult, SearchService};
