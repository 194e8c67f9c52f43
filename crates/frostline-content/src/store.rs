//! Content Store capability trait

use async_trait::async_trait;
use frostline_core::UtcDateTime;
use frostline_entities::{blog_posts, categories, machines};
use thiserror::Error;

/// Errors surfaced by content store implementations
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ContentError {
    fn from(err: sea_orm::DbErr) -> Self {
        ContentError::Database(err.to_string())
    }
}

/// Result type alias for content store operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Fields required to create a blog post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: String,
    pub featured_image_url: Option<String>,
    pub published: bool,
    pub published_at: Option<UtcDateTime>,
}

/// Persistence capability consumed by the import and search services.
///
/// Search lookups take a SQL LIKE pattern (already wildcard-wrapped by the
/// caller) and match case-insensitively.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a blog post by its slug
    async fn get_post_by_slug(&self, slug: &str) -> ContentResult<Option<blog_posts::Model>>;

    /// Create a blog post. Fails on constraint violations (e.g. duplicate slug).
    async fn create_post(&self, post: NewPost) -> ContentResult<blog_posts::Model>;

    /// Match machines against name, model number or either description
    async fn search_machines(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<machines::Model>>;

    /// Match categories against name or description
    async fn search_categories(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<categories::Model>>;

    /// Match published blog posts against title, excerpt or content
    async fn search_published_posts(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<blog_posts::Model>>;
}
