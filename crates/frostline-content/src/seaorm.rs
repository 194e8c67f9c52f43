//! SeaORM-backed Content Store

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use tracing::debug;

use frostline_entities::{blog_posts, categories, machines};

use crate::store::{ContentResult, ContentStore, NewPost};

/// Content store backed by the relational database
pub struct SeaOrmContentStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmContentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentStore for SeaOrmContentStore {
    async fn get_post_by_slug(&self, slug: &str) -> ContentResult<Option<blog_posts::Model>> {
        let post = blog_posts::Entity::find()
            .filter(blog_posts::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?;

        Ok(post)
    }

    async fn create_post(&self, post: NewPost) -> ContentResult<blog_posts::Model> {
        debug!(slug = %post.slug, "Creating blog post");

        let model = blog_posts::ActiveModel {
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            excerpt: Set(post.excerpt),
            author: Set(post.author),
            featured_image_url: Set(post.featured_image_url),
            published: Set(post.published),
            published_at: Set(post.published_at),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        Ok(model)
    }

    async fn search_machines(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<machines::Model>> {
        let machines = machines::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::col(machines::Column::Name).ilike(pattern))
                    .add(Expr::col(machines::Column::ModelNumber).ilike(pattern))
                    .add(Expr::col(machines::Column::ShortDescription).ilike(pattern))
                    .add(Expr::col(machines::Column::LongDescription).ilike(pattern)),
            )
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(machines)
    }

    async fn search_categories(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<categories::Model>> {
        let categories = categories::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::col(categories::Column::Name).ilike(pattern))
                    .add(Expr::col(categories::Column::Description).ilike(pattern)),
            )
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(categories)
    }

    async fn search_published_posts(
        &self,
        pattern: &str,
        limit: u64,
    ) -> ContentResult<Vec<blog_posts::Model>> {
        let posts = blog_posts::Entity::find()
            .filter(blog_posts::Column::Published.eq(true))
            .filter(
                Condition::any()
                    .add(Expr::col(blog_posts::Column::Title).ilike(pattern))
                    .add(Expr::col(blog_posts::Column::Excerpt).ilike(pattern))
                    .add(Expr::col(blog_posts::Column::Content).ilike(pattern)),
            )
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn sample_post(id: i32, slug: &str) -> blog_posts::Model {
        let now = chrono::Utc::now();
        blog_posts::Model {
            id,
            title: "Choosing a Soft Serve Machine".to_string(),
            slug: slug.to_string(),
            content: "<p>Freezing cylinders explained.</p>".to_string(),
            excerpt: None,
            author: "Admin".to_string(),
            featured_image_url: None,
            published: true,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn get_post_by_slug_returns_match() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_post(1, "soft-serve-guide")]])
            .into_connection();
        let store = SeaOrmContentStore::new(Arc::new(db));

        let post = store.get_post_by_slug("soft-serve-guide").await.unwrap();
        assert_eq!(post.unwrap().id, 1);
    }

    #[tokio::test]
    async fn get_post_by_slug_returns_none_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_posts::Model>::new()])
            .into_connection();
        let store = SeaOrmContentStore::new(Arc::new(db));

        let post = store.get_post_by_slug("missing").await.unwrap();
        assert!(post.is_none());
    }

    #[tokio::test]
    async fn create_post_inserts_and_returns_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_post(7, "new-post")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 7,
                rows_affected: 1,
            }])
            .into_connection();
        let store = SeaOrmContentStore::new(Arc::new(db));

        let created = store
            .create_post(NewPost {
                title: "Choosing a Soft Serve Machine".to_string(),
                slug: "new-post".to_string(),
                content: "<p>Freezing cylinders explained.</p>".to_string(),
                excerpt: None,
                author: "Admin".to_string(),
                featured_image_url: None,
                published: true,
                published_at: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 7);
        assert_eq!(created.slug, "new-post");
    }

    #[tokio::test]
    async fn search_machines_returns_rows() {
        let now = chrono::Utc::now();
        let machine = machines::Model {
            id: 3,
            name: "Taylor C713".to_string(),
            slug: "taylor-c713".to_string(),
            model_number: "C713".to_string(),
            short_description: Some("Two-flavor soft serve freezer".to_string()),
            long_description: None,
            category_id: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![machine]])
            .into_connection();
        let store = SeaOrmContentStore::new(Arc::new(db));

        let results = store.search_machines("%taylor%", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].model_number, "C713");
    }
}
