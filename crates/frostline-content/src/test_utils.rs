//! In-memory Content Store for use by other crates in their tests
//!
//! Mirrors the case-insensitive substring semantics of the SQL store and
//! supports failure injection for exercising error paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use frostline_entities::{blog_posts, categories, machines};

use crate::store::{ContentError, ContentResult, ContentStore, NewPost};

/// In-memory content store for tests
#[derive(Default)]
pub struct MemoryContentStore {
    machines: Mutex<Vec<machines::Model>>,
    categories: Mutex<Vec<categories::Model>>,
    posts: Mutex<Vec<blog_posts::Model>>,
    next_post_id: AtomicI32,
    /// Slugs for which create_post fails, simulating constraint violations
    failing_slugs: Mutex<HashSet<String>>,
    /// When set, every search lookup fails
    fail_searches: AtomicBool,
    search_calls: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            next_post_id: AtomicI32::new(1),
            ..Default::default()
        }
    }

    pub fn add_machine(&self, name: &str, model_number: &str, short_description: Option<&str>) {
        let now = chrono::Utc::now();
        let mut machines = self.machines.lock().unwrap();
        let id = machines.len() as i32 + 1;
        machines.push(machines::Model {
            id,
            name: name.to_string(),
            slug: slug::slugify(name),
            model_number: model_number.to_string(),
            short_description: short_description.map(str::to_string),
            long_description: None,
            category_id: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn add_category(&self, name: &str, description: Option<&str>) {
        let now = chrono::Utc::now();
        let mut categories = self.categories.lock().unwrap();
        let id = categories.len() as i32 + 1;
        categories.push(categories::Model {
            id,
            name: name.to_string(),
            slug: slug::slugify(name),
            description: description.map(str::to_string),
            parent_id: None,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn add_post(&self, title: &str, slug_value: &str, published: bool) {
        let now = chrono::Utc::now();
        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst);
        self.posts.lock().unwrap().push(blog_posts::Model {
            id,
            title: title.to_string(),
            slug: slug_value.to_string(),
            content: String::new(),
            excerpt: None,
            author: "Admin".to_string(),
            featured_image_url: None,
            published,
            published_at: None,
            created_at: now,
            updated_at: now,
        });
    }

    /// Make create_post fail for the given slug
    pub fn fail_create_for(&self, slug_value: &str) {
        self.failing_slugs
            .lock()
            .unwrap()
            .insert(slug_value.to_string());
    }

    /// Make every search lookup fail
    pub fn fail_searches(&self) {
        self.fail_searches.store(true, Ordering::SeqCst);
    }

    /// Number of search lookups issued against this store
    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<blog_posts::Model> {
        self.posts.lock().unwrap().clone()
    }

    fn check_search(&self) -> ContentResult<()> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(ContentError::Database("connection reset".to_string()));
        }
        Ok(())
    }
}

/// Case-insensitive contains matching the semantics of an ILIKE '%q%' lookup
fn matches(pattern: &str, field: Option<&str>) -> bool {
    let needle = pattern.trim_matches('%').to_lowercase();
    field
        .map(|f| f.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_post_by_slug(&self, slug: &str) -> ContentResult<Option<blog_posts::Model>> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_post(&self, post: NewPost) -> ContentResult<blog_posts::Model> {
        if self.failing_slugs.lock().unwrap().contains(&post.slug) {
            return Err(ContentError::Database(format!(
                "duplicate key value violates unique constraint \"idx_blog_posts_slug_unique\" (slug: {})",
                post.slug
            )));
        }

        let now = chrono::Utc::now();
        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst);
        let model = blog_posts::Model {
            id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            author: post.author,
            featured_image_url: post.featured_image_url,
            published: post.published,
            published_at: post.published_at,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(model.clone());
        Ok(model)
    }

    async fn search_machines(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<machines::Model>> {
        self.check_search()?;
        let machines = self.machines.lock().unwrap();
        Ok(machines
            .iter()
            .filter(|m| {
                matches(pattern, Some(&m.name))
                    || matches(pattern, Some(&m.model_number))
                    || matches(pattern, m.short_description.as_deref())
                    || matches(pattern, m.long_description.as_deref())
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search_categories(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<categories::Model>> {
        self.check_search()?;
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| {
                matches(pattern, Some(&c.name)) || matches(pattern, c.description.as_deref())
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search_published_posts(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<blog_posts::Model>> {
        self.check_search()?;
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .iter()
            .filter(|p| p.published)
            .filter(|p| {
                matches(pattern, Some(&p.title))
                    || matches(pattern, p.excerpt.as_deref())
                    || matches(pattern, Some(&p.content))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
