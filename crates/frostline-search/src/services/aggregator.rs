//! Search aggregator service
//!
//! The three sub-queries are issued concurrently but the merged list is only
//! returned once all of them complete. Results keep a fixed section order
//! (machines, then categories, then blog posts) with no cross-type ranking.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

use frostline_content::{ContentError, ContentStore};

/// Queries shorter than this (after trimming) return no results
pub const MIN_QUERY_LENGTH: usize = 2;

/// Result cap for the machine sub-query
pub const MACHINE_LIMIT: u64 = 10;
/// Result cap for the category sub-query
pub const CATEGORY_LIMIT: u64 = 5;
/// Result cap for the blog sub-query
pub const BLOG_LIMIT: u64 = 5;

/// Errors surfaced by the search service
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search failed: {0}")]
    Store(#[from] ContentError),
}

/// A single search hit, tagged with the collection it came from
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Machine {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        href: String,
        #[serde(rename = "modelNumber")]
        model_number: String,
    },
    Category {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        href: String,
    },
    Blog {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        href: String,
    },
}

/// Search service fanning queries out across the Content Store
pub struct SearchService {
    store: Arc<dyn ContentStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Run a site-wide search.
    ///
    /// Trimmed queries below [`MIN_QUERY_LENGTH`] short-circuit to an empty
    /// list without touching the store. A failure in any sub-query fails the
    /// whole search; no partial results are returned.
    pub async fn search(&self, raw_query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let query = raw_query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Ok(Vec::new());
        }

        let pattern = format!("%{query}%");
        debug!(query = %query, "Running site search");

        let (machines, categories, posts) = tokio::try_join!(
            self.store.search_machines(&pattern, MACHINE_LIMIT),
            self.store.search_categories(&pattern, CATEGORY_LIMIT),
            self.store.search_published_posts(&pattern, BLOG_LIMIT),
        )?;

        let mut results =
            Vec::with_capacity(machines.len() + categories.len() + posts.len());

        for machine in machines {
            results.push(SearchResult::Machine {
                title: machine.name,
                description: machine.short_description,
                href: format!("/machines/{}", machine.slug),
                model_number: machine.model_number,
            });
        }

        for category in categories {
            results.push(SearchResult::Category {
                title: category.name,
                description: category.description,
                href: format!("/categories/{}", category.slug),
            });
        }

        for post in posts {
            results.push(SearchResult::Blog {
                title: post.title,
                description: post.excerpt,
                href: format!("/blog/{}", post.slug),
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostline_content::test_utils::MemoryContentStore;

    #[tokio::test]
    async fn short_query_returns_empty_without_store_access() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_machine("Taylor C712", "C712-27", None);

        let service = SearchService::new(store.clone());
        let results = service.search("a").await.unwrap();

        assert!(results.is_empty());
        assert_eq!(store.search_call_count(), 0);
    }

    #[tokio::test]
    async fn whitespace_query_returns_empty() {
        let store = Arc::new(MemoryContentStore::new());
        let service = SearchService::new(store.clone());

        let results = service.search("   ").await.unwrap();

        assert!(results.is_empty());
        assert_eq!(store.search_call_count(), 0);
    }

    #[tokio::test]
    async fn sections_keep_fixed_order() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_machine("Taylor C712 Soft Serve", "C712-27", Some("Twin twist freezer"));
        store.add_category("Taylor Equipment", Some("All Taylor machines"));
        store.add_post("Taylor Maintenance Tips", "taylor-maintenance-tips", true);

        let service = SearchService::new(store);
        let results = service.search("taylor").await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], SearchResult::Machine { .. }));
        assert!(matches!(results[1], SearchResult::Category { .. }));
        assert!(matches!(results[2], SearchResult::Blog { .. }));
    }

    #[tokio::test]
    async fn hrefs_point_at_slug_pages() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_machine("Hoshizaki KM-515", "KM-515MAJ", None);

        let service = SearchService::new(store);
        let results = service.search("hoshizaki").await.unwrap();

        match &results[0] {
            SearchResult::Machine {
                href, model_number, ..
            } => {
                assert_eq!(href, "/machines/hoshizaki-km-515");
                assert_eq!(model_number, "KM-515MAJ");
            }
            other => panic!("expected machine result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn matching_is_case_insensitive() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_machine("Taylor C712", "C712-27", None);

        let service = SearchService::new(store);
        let results = service.search("TAYLOR").await.unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_fails_the_whole_search() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_machine("Taylor C712", "C712-27", None);
        store.fail_searches();

        let service = SearchService::new(store);
        let err = service.search("taylor").await.unwrap_err();

        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn unpublished_posts_never_surface() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_post("Hidden Draft", "hidden-draft", false);

        let service = SearchService::new(store);
        let results = service.search("hidden").await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn machine_results_serialize_with_camel_case_model_number() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_machine("Taylor C712", "C712-27", Some("Twin twist"));

        let service = SearchService::new(store);
        let results = service.search("taylor").await.unwrap();

        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["type"], "machine");
        assert_eq!(json["modelNumber"], "C712-27");
        assert_eq!(json["href"], "/machines/taylor-c712");
    }
}
