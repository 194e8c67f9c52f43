//! Import orchestrator service
//!
//! Drives parsed export records through the Content Store one at a time.
//! Each record lands in exactly one of imported/skipped/errors; a failing
//! record never aborts the rest of the batch.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use frostline_content::{ContentStore, NewPost};

use crate::parser::ParsedExport;

/// Author recorded when the export does not name one
pub const DEFAULT_AUTHOR: &str = "Admin";

/// Batch options taken from the upload form
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Force every created post to unpublished regardless of source status
    pub import_as_draft: bool,
    /// Skip records whose slug already exists in the store
    pub skip_duplicates: bool,
}

/// A record that was persisted
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportedEntry {
    pub id: i32,
    pub title: String,
    pub slug: String,
}

/// A record that was skipped without touching the store
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedEntry {
    pub title: String,
    pub reason: String,
}

/// A record the store rejected
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FailedEntry {
    pub title: String,
    pub error: String,
}

/// Terminal report of a batch import run
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ImportOutcome {
    pub imported: Vec<ImportedEntry>,
    pub skipped: Vec<SkippedEntry>,
    pub errors: Vec<FailedEntry>,
}

impl ImportOutcome {
    pub fn total(&self) -> usize {
        self.imported.len() + self.skipped.len() + self.errors.len()
    }
}

/// Import orchestrator coordinating the per-record loop
pub struct ImportOrchestrator {
    store: Arc<dyn ContentStore>,
}

impl ImportOrchestrator {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Import every parsed record in document order.
    ///
    /// The loop is strictly sequential: a record's outcome is finalized
    /// before the next record starts, so duplicate checks observe creations
    /// made earlier in the same batch.
    pub async fn import_posts(
        &self,
        export: &ParsedExport,
        options: ImportOptions,
    ) -> ImportOutcome {
        info!(
            posts = export.posts.len(),
            import_as_draft = options.import_as_draft,
            skip_duplicates = options.skip_duplicates,
            "Starting WordPress import batch"
        );

        let mut outcome = ImportOutcome::default();

        for post in &export.posts {
            // Fallback slug generation always happens here, never upstream
            let slug_value = if post.slug.is_empty() {
                slug::slugify(&post.title)
            } else {
                post.slug.clone()
            };

            if options.skip_duplicates {
                match self.store.get_post_by_slug(&slug_value).await {
                    Ok(Some(_)) => {
                        debug!(slug = %slug_value, "Skipping duplicate");
                        outcome.skipped.push(SkippedEntry {
                            title: post.title.clone(),
                            reason: "Duplicate slug".to_string(),
                        });
                        continue;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(slug = %slug_value, error = %e, "Duplicate lookup failed");
                        outcome.errors.push(FailedEntry {
                            title: post.title.clone(),
                            error: e.to_string(),
                        });
                        continue;
                    }
                }
            }

            let published = if options.import_as_draft {
                false
            } else {
                post.status == "publish"
            };

            let new_post = NewPost {
                title: post.title.clone(),
                slug: slug_value.clone(),
                content: post.content.clone(),
                excerpt: post.excerpt.clone(),
                author: post
                    .author
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
                featured_image_url: post.featured_image_url.clone(),
                published,
                published_at: post.published_at,
            };

            match self.store.create_post(new_post).await {
                Ok(created) => {
                    outcome.imported.push(ImportedEntry {
                        id: created.id,
                        title: created.title,
                        slug: created.slug,
                    });
                }
                Err(e) => {
                    warn!(slug = %slug_value, error = %e, "Post creation failed");
                    outcome.errors.push(FailedEntry {
                        title: post.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            imported = outcome.imported.len(),
            skipped = outcome.skipped.len(),
            errors = outcome.errors.len(),
            "Import batch finished"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostline_content::test_utils::MemoryContentStore;

    fn export_with_posts(posts: Vec<crate::parser::ImportedPost>) -> ParsedExport {
        let item_count = posts.len();
        ParsedExport {
            posts,
            item_count,
            ..Default::default()
        }
    }

    fn post(title: &str, slug: &str, status: &str) -> crate::parser::ImportedPost {
        crate::parser::ImportedPost {
            title: title.to_string(),
            slug: slug.to_string(),
            content: format!("<p>{title}</p>"),
            excerpt: None,
            author: None,
            featured_image_url: None,
            status: status.to_string(),
            published_at: None,
        }
    }

    #[tokio::test]
    async fn every_record_lands_in_exactly_one_bucket() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_post("Existing", "existing", true);
        store.fail_create_for("broken");

        let export = export_with_posts(vec![
            post("Fresh", "fresh", "publish"),
            post("Existing", "existing", "publish"),
            post("Broken", "broken", "publish"),
        ]);

        let orchestrator = ImportOrchestrator::new(store);
        let outcome = orchestrator
            .import_posts(
                &export,
                ImportOptions {
                    import_as_draft: false,
                    skip_duplicates: true,
                },
            )
            .await;

        assert_eq!(outcome.imported.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.total(), export.posts.len());
    }

    #[tokio::test]
    async fn duplicate_slug_is_skipped_with_fixed_reason() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_post("Older Post", "shared-slug", true);

        let export = export_with_posts(vec![post("Newer Post", "shared-slug", "publish")]);
        let orchestrator = ImportOrchestrator::new(store);
        let outcome = orchestrator
            .import_posts(
                &export,
                ImportOptions {
                    import_as_draft: false,
                    skip_duplicates: true,
                },
            )
            .await;

        assert!(outcome.imported.is_empty());
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.skipped[0].reason, "Duplicate slug");
    }

    #[tokio::test]
    async fn duplicates_import_normally_when_skip_is_off() {
        let store = Arc::new(MemoryContentStore::new());
        store.add_post("Older Post", "shared-slug", true);

        let export = export_with_posts(vec![post("Newer Post", "shared-slug", "publish")]);
        let orchestrator = ImportOrchestrator::new(store.clone());
        let outcome = orchestrator
            .import_posts(&export, ImportOptions::default())
            .await;

        // The in-memory store has no unique index; the record goes through
        assert_eq!(outcome.imported.len(), 1);
    }

    #[tokio::test]
    async fn import_as_draft_overrides_publish_status() {
        let store = Arc::new(MemoryContentStore::new());
        let export = export_with_posts(vec![post("Published Upstream", "published", "publish")]);

        let orchestrator = ImportOrchestrator::new(store.clone());
        orchestrator
            .import_posts(
                &export,
                ImportOptions {
                    import_as_draft: true,
                    skip_duplicates: false,
                },
            )
            .await;

        let created = &store.posts()[0];
        assert!(!created.published);
    }

    #[tokio::test]
    async fn only_publish_status_becomes_published() {
        let store = Arc::new(MemoryContentStore::new());
        let export = export_with_posts(vec![
            post("Live", "live", "publish"),
            post("Pending", "pending", "pending"),
            post("Draft", "draft-post", "draft"),
        ]);

        let orchestrator = ImportOrchestrator::new(store.clone());
        orchestrator
            .import_posts(&export, ImportOptions::default())
            .await;

        let posts = store.posts();
        assert!(posts.iter().find(|p| p.slug == "live").unwrap().published);
        assert!(!posts.iter().find(|p| p.slug == "pending").unwrap().published);
        assert!(!posts.iter().find(|p| p.slug == "draft-post").unwrap().published);
    }

    #[tokio::test]
    async fn empty_slug_gets_generated_from_title() {
        let store = Arc::new(MemoryContentStore::new());
        let export = export_with_posts(vec![post("Walk-In Cooler Basics", "", "publish")]);

        let orchestrator = ImportOrchestrator::new(store.clone());
        let outcome = orchestrator
            .import_posts(&export, ImportOptions::default())
            .await;

        assert_eq!(outcome.imported[0].slug, "walk-in-cooler-basics");
    }

    #[tokio::test]
    async fn missing_author_gets_placeholder() {
        let store = Arc::new(MemoryContentStore::new());
        let export = export_with_posts(vec![post("Anonymous Post", "anonymous", "publish")]);

        let orchestrator = ImportOrchestrator::new(store.clone());
        orchestrator
            .import_posts(&export, ImportOptions::default())
            .await;

        assert_eq!(store.posts()[0].author, DEFAULT_AUTHOR);
    }

    #[tokio::test]
    async fn creation_failure_does_not_abort_the_batch() {
        let store = Arc::new(MemoryContentStore::new());
        store.fail_create_for("second");

        let export = export_with_posts(vec![
            post("First", "first", "publish"),
            post("Second", "second", "publish"),
            post("Third", "third", "publish"),
        ]);

        let orchestrator = ImportOrchestrator::new(store);
        let outcome = orchestrator
            .import_posts(&export, ImportOptions::default())
            .await;

        assert_eq!(outcome.imported.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].title, "Second");
        assert!(outcome.errors[0].error.contains("unique constraint"));
    }
}
