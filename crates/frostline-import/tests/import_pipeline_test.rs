//! End-to-end tests for the parse-then-import pipeline

use std::sync::Arc;

use frostline_content::test_utils::MemoryContentStore;
use frostline_import::{parse_wordpress_export, ImportOptions, ImportOrchestrator};

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:dc="http://purl.org/dc/elements/1.1/"
     xmlns:wp="http://wordpress.org/export/1.2/">
  <channel>
    <title>Frostline Blog</title>
    <item>
      <title>Choosing a Walk-In Cooler</title>
      <dc:creator>maria</dc:creator>
      <wp:post_name>choosing-a-walk-in-cooler</wp:post_name>
      <wp:status>publish</wp:status>
      <wp:post_date>2024-03-15 09:30:00</wp:post_date>
      <content:encoded><![CDATA[<p>Sizing guidance for walk-in coolers.</p>]]></content:encoded>
      <category domain="category"><![CDATA[Refrigeration]]></category>
      <category domain="post_tag"><![CDATA[coolers]]></category>
    </item>
    <item>
      <dc:creator>maria</dc:creator>
      <wp:post_name>untitled-item</wp:post_name>
      <wp:status>publish</wp:status>
      <content:encoded><![CDATA[<p>This one has no title.</p>]]></content:encoded>
    </item>
    <item>
      <title>Fryer Maintenance Checklist</title>
      <wp:post_name>fryer-maintenance-checklist</wp:post_name>
      <wp:status>draft</wp:status>
      <content:encoded><![CDATA[<p>Weekly fryer upkeep.</p>]]></content:encoded>
      <category domain="post_tag"><![CDATA[fryers]]></category>
    </item>
  </channel>
</rss>"#;

#[tokio::test]
async fn full_pipeline_imports_valid_items_and_reports_parse_errors() {
    let export = parse_wordpress_export(EXPORT).unwrap();
    assert_eq!(export.item_count, 3);
    assert_eq!(export.posts.len(), 2);
    assert_eq!(export.parse_errors.len(), 1);
    assert!(export.parse_errors[0].contains("missing title"));

    let store = Arc::new(MemoryContentStore::new());
    let orchestrator = ImportOrchestrator::new(store.clone());
    let outcome = orchestrator
        .import_posts(&export, ImportOptions::default())
        .await;

    assert_eq!(outcome.imported.len(), 2);
    assert!(outcome.skipped.is_empty());
    assert!(outcome.errors.is_empty());

    let posts = store.posts();
    let cooler = posts
        .iter()
        .find(|p| p.slug == "choosing-a-walk-in-cooler")
        .unwrap();
    assert!(cooler.published);
    assert_eq!(cooler.author, "maria");
    assert!(cooler.published_at.is_some());

    let fryer = posts
        .iter()
        .find(|p| p.slug == "fryer-maintenance-checklist")
        .unwrap();
    assert!(!fryer.published, "draft status must not publish");
}

#[tokio::test]
async fn metadata_sets_span_the_whole_document() {
    let export = parse_wordpress_export(EXPORT).unwrap();

    let categories: Vec<&str> = export.categories.iter().map(String::as_str).collect();
    let tags: Vec<&str> = export.tags.iter().map(String::as_str).collect();
    assert_eq!(categories, vec!["Refrigeration"]);
    assert_eq!(tags, vec!["coolers", "fryers"]);
}

#[tokio::test]
async fn rerunning_with_skip_duplicates_skips_everything() {
    let export = parse_wordpress_export(EXPORT).unwrap();
    let store = Arc::new(MemoryContentStore::new());
    let orchestrator = ImportOrchestrator::new(store);

    let first = orchestrator
        .import_posts(
            &export,
            ImportOptions {
                import_as_draft: false,
                skip_duplicates: true,
            },
        )
        .await;
    assert_eq!(first.imported.len(), 2);

    let second = orchestrator
        .import_posts(
            &export,
            ImportOptions {
                import_as_draft: false,
                skip_duplicates: true,
            },
        )
        .await;
    assert!(second.imported.is_empty());
    assert_eq!(second.skipped.len(), 2);
    assert!(second
        .skipped
        .iter()
        .all(|s| s.reason == "Duplicate slug"));
}

#[tokio::test]
async fn import_as_draft_unpublishes_the_whole_batch() {
    let export = parse_wordpress_export(EXPORT).unwrap();
    let store = Arc::new(MemoryContentStore::new());
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

    assert!(store.posts().iter().all(|p| !p.published));
}

#[tokio::test]
async fn outcome_buckets_partition_the_post_sequence() {
    let export = parse_wordpress_export(EXPORT).unwrap();
    let store = Arc::new(MemoryContentStore::new());
    store.fail_create_for("fryer-maintenance-checklist");

    let orchestrator = ImportOrchestrator::new(store);
    let outcome = orchestrator
        .import_posts(&export, ImportOptions::default())
        .await;

    assert_eq!(
        outcome.imported.len() + outcome.skipped.len() + outcome.errors.len(),
        export.posts.len()
    );
    assert_eq!(outcome.errors.len(), 1);
}
