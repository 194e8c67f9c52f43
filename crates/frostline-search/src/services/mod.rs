//! Business logic for search aggregation

mod aggregator;

pub use aggregator::{
    SearchError, SearchResult, SearchService, BLOG_LIMIT, CATEGORY_LIMIT, MACHINE_LIMIT,
    MIN_QUERY_LENGTH,
};
