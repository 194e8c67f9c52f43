//! HTTP-level tests for the search endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use frostline_content::test_utils::MemoryContentStore;
use frostline_search::handlers::{self, types::AppState};
use frostline_search::services::SearchService;

fn router(store: Arc<MemoryContentStore>) -> axum::Router {
    let state = Arc::new(AppState {
        search_service: Arc::new(SearchService::new(store)),
    });
    handlers::configure_routes().with_state(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn search_returns_typed_results() {
    let store = Arc::new(MemoryContentStore::new());
    store.add_machine("Taylor C712", "C712-27", Some("Twin twist freezer"));
    store.add_post("Taylor Cleaning Guide", "taylor-cleaning-guide", true);

    let response = router(store)
        .oneshot(
            Request::builder()
                .uri("/search?q=taylor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["type"], "machine");
    assert_eq!(results[0]["modelNumber"], "C712-27");
    assert_eq!(results[1]["type"], "blog");
    assert_eq!(results[1]["href"], "/blog/taylor-cleaning-guide");
}

#[tokio::test]
async fn single_character_query_yields_empty_results() {
    let store = Arc::new(MemoryContentStore::new());
    store.add_machine("Taylor C712", "C712-27", None);

    let response = router(store.clone())
        .oneshot(
            Request::builder()
                .uri("/search?q=a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
    assert_eq!(store.search_call_count(), 0);
}

#[tokio::test]
async fn missing_query_param_yields_empty_results() {
    let store = Arc::new(MemoryContentStore::new());

    let response = router(store)
        .oneshot(
            Request::builder()
                .uri("/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn store_failure_returns_500_with_empty_results() {
    let store = Arc::new(MemoryContentStore::new());
    store.add_machine("Taylor C712", "C712-27", None);
    store.fail_searches();

    let response = router(store)
        .oneshot(
            Request::builder()
                .uri("/search?q=taylor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Search failed"));
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
}
