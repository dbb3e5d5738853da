//! Integration tests for bookrec-api endpoints
//!
//! Tests cover:
//! - /popular returns the full table with the five projected fields
//! - /recommend ranking, self-exclusion, and the not-found payload
//! - /health and /build_info
//! - CORS restricted to the configured origin

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use bookrec_api::{build_router, AppState};
use bookrec_common::artifacts::{
    BookRecord, MetadataTable, PivotTable, PopularBook, SimilarityMatrix,
};
use bookrec_common::ArtifactStore;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

const ORIGIN: &str = "http://localhost:5173";

fn popular_book(title: &str, author: &str, num_ratings: u64, avg_rating: f64) -> PopularBook {
    PopularBook {
        title: title.to_string(),
        author: Some(author.to_string()),
        image_url: Some(format!("http://img/{}.jpg", title)),
        num_ratings,
        avg_rating,
    }
}

fn book(title: &str) -> BookRecord {
    BookRecord {
        title: title.to_string(),
        author: Some(format!("Author of {}", title)),
        image_url: Some(format!("http://img/{}.jpg", title)),
    }
}

/// Test helper: small store with six titles, metadata for all but "F"
fn test_store() -> ArtifactStore {
    let titles = ["A", "B", "C", "D", "E", "F"];
    let popular = vec![
        popular_book("Dune", "Frank Herbert", 412, 4.31),
        popular_book("Emma", "Jane Austen", 250, 3.9),
        popular_book("Ulysses", "James Joyce", 101, 3.2),
    ];

    ArtifactStore::new(
        popular,
        PivotTable::new(titles.iter().map(|t| t.to_string()).collect(), 2),
        MetadataTable::new(vec![book("A"), book("B"), book("C"), book("B"), book("D"), book("E")]),
        SimilarityMatrix::new(vec![
            vec![1.0, 0.9, 0.2, 0.5, 0.4, 0.95],
            vec![0.9, 1.0, 0.3, 0.1, 0.1, 0.1],
            vec![0.2, 0.3, 1.0, 0.1, 0.1, 0.1],
            vec![0.5, 0.1, 0.1, 1.0, 0.1, 0.1],
            vec![0.4, 0.1, 0.1, 0.1, 1.0, 0.1],
            vec![0.95, 0.1, 0.1, 0.1, 0.1, 1.0],
        ]),
    )
}

/// Test helper: Create app with test state
fn setup_app(store: ArtifactStore) -> axum::Router {
    build_router(AppState::new(store), ORIGIN).expect("Should build router")
}

/// Test helper: POST /recommend with the given title
fn recommend_request(title: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "user_input": title }).to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn recommended_titles(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .expect("Should have recommendations array")
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Popularity Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_popular_returns_full_table_in_order() {
    let app = setup_app(test_store());

    let response = app.oneshot(get_request("/popular")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let books = body["books"].as_array().expect("Should have books array");

    assert_eq!(books.len(), 3);
    assert_eq!(books[0]["Book-Title"], "Dune");
    assert_eq!(books[1]["Book-Title"], "Emma");
    assert_eq!(books[2]["Book-Title"], "Ulysses");
}

#[tokio::test]
async fn test_popular_record_field_set() {
    let app = setup_app(test_store());

    let response = app.oneshot(get_request("/popular")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let first = body["books"][0].as_object().unwrap();

    let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["Book-Author", "Book-Title", "Image-URL-M", "avg_rating", "num_ratings"]
    );
    assert_eq!(first["Book-Author"], "Frank Herbert");
    assert_eq!(first["Image-URL-M"], "http://img/Dune.jpg");
    assert_eq!(first["num_ratings"], 412);
    assert_eq!(first["avg_rating"], 4.31);
}

#[tokio::test]
async fn test_popular_empty_table() {
    let app = setup_app(ArtifactStore::default());

    let response = app.oneshot(get_request("/popular")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({ "books": [] }));
}

// =============================================================================
// Recommendation Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_recommend_orders_by_similarity() {
    let store = ArtifactStore::new(
        Vec::new(),
        PivotTable::new(vec!["A".into(), "B".into(), "C".into()], 0),
        MetadataTable::new(vec![book("A"), book("B"), book("C")]),
        SimilarityMatrix::new(vec![
            vec![1.0, 0.9, 0.2],
            vec![0.9, 1.0, 0.3],
            vec![0.2, 0.3, 1.0],
        ]),
    );
    let app = setup_app(store);

    let response = app.oneshot(recommend_request("A")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(recommended_titles(&body), vec!["B", "C"]);
}

#[tokio::test]
async fn test_recommend_excludes_query_and_caps_at_four() {
    let app = setup_app(test_store());

    let response = app.oneshot(recommend_request("A")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let titles = recommended_titles(&body);

    // Ranks 2..=5 are F, B, D, E; F has no metadata and is skipped
    assert_eq!(titles, vec!["B", "D", "E"]);
    assert!(titles.len() <= 4);
    assert!(!titles.contains(&"A".to_string()));
}

#[tokio::test]
async fn test_recommend_record_shape() {
    let app = setup_app(test_store());

    let response = app.oneshot(recommend_request("C")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let first = &body["recommendations"][0];

    assert_eq!(first["title"], "B");
    assert_eq!(first["author"], "Author of B");
    assert_eq!(first["image"], "http://img/B.jpg");
    assert_eq!(first.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_recommend_unknown_title() {
    let app = setup_app(test_store());

    let response = app.oneshot(recommend_request("Not A Real Book")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({ "error": "Book not found" }));
}

#[tokio::test]
async fn test_recommend_is_case_sensitive() {
    let app = setup_app(test_store());

    let response = app.oneshot(recommend_request("a")).await.unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(body, json!({ "error": "Book not found" }));
}

#[tokio::test]
async fn test_recommend_is_deterministic() {
    let app = setup_app(test_store());

    let first = app.clone().oneshot(recommend_request("D")).await.unwrap();
    let second = app.oneshot(recommend_request("D")).await.unwrap();

    assert_eq!(
        extract_json(first.into_body()).await,
        extract_json(second.into_body()).await
    );
}

#[tokio::test]
async fn test_recommend_missing_field_is_rejected() {
    let app = setup_app(test_store());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title": "A"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

// =============================================================================
// Health / Build Info Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(test_store());

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bookrec-api");
    assert!(body["version"].is_string());
    assert_eq!(
        body["artifacts"],
        json!({
            "popular_books": 3,
            "indexed_titles": 6,
            "metadata_records": 6,
            "similarity_rows": 6
        })
    );
}

#[tokio::test]
async fn test_health_reports_empty_tables() {
    let app = setup_app(ArtifactStore::default());

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["artifacts"]["indexed_titles"], 0);
    assert_eq!(body["artifacts"]["similarity_rows"], 0);
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let app = setup_app(test_store());

    let response = app.oneshot(get_request("/build_info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// CORS Tests
// =============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = setup_app(test_store());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/popular")
        .header(header::ORIGIN, ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ORIGIN
    );
}

#[tokio::test]
async fn test_cors_rejects_other_origin() {
    let app = setup_app(test_store());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/popular")
        .header(header::ORIGIN, "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[test]
fn test_invalid_origin_fails_router_build() {
    let result = build_router(AppState::new(test_store()), "bad\norigin");
    assert!(result.is_err());
}
