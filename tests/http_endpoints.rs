//! HTTP Endpoint Tests
//!
//! Drives the full router in-process with `oneshot`; no sockets.

mod common;

use std::fs;
use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tabviewer::http_server::{HttpServer, HttpServerConfig, PARQUET_PREFIX, VIEWER_PREFIX};

use common::{create_temp_dir, write_maintenance_parquet, write_people_csv};

fn router_for(root: &Path) -> Router {
    HttpServer::with_config(HttpServerConfig::with_root(root))
        .unwrap()
        .router()
}

async fn post_raw(router: Router, uri: String, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(router: Router, uri: String, body: Value) -> (StatusCode, Value) {
    post_raw(router, uri, Body::from(body.to_string())).await
}

fn viewer(endpoint: &str) -> String {
    format!("{}/{}", VIEWER_PREFIX, endpoint)
}

fn parquet(endpoint: &str) -> String {
    format!("{}/{}", PARQUET_PREFIX, endpoint)
}

// =============================================================================
// Success paths
// =============================================================================

#[tokio::test]
async fn test_health() {
    let dir = create_temp_dir();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = router_for(dir.path()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metadata_for_csv() {
    let dir = create_temp_dir();
    write_people_csv(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        viewer("metadata"),
        json!({"path": "people.csv"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRows"], json!(4));
    assert_eq!(body["columns"][1], json!({"name": "age", "type": "int64"}));
    assert!(body["fileSize"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_data_with_regex_filter() {
    let dir = create_temp_dir();
    write_maintenance_parquet(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        viewer("data"),
        json!({
            "path": "maintenance.parquet",
            "offset": 0,
            "limit": 50,
            "filters": {"is_maintenance": {"type": "text", "value": "^(1)$"}},
            "useRegex": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRows"], json!(4));
    assert_eq!(body["hasMore"], json!(false));
    let indices: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["__row_index__"].clone())
        .collect();
    assert_eq!(indices, vec![json!(2), json!(5), json!(9), json!(12)]);
}

#[tokio::test]
async fn test_data_sorted_descending() {
    let dir = create_temp_dir();
    write_people_csv(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        viewer("data"),
        json!({"path": "people.csv", "sortBy": "age", "sortOrder": "desc", "limit": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], json!("ALINA"));
    assert_eq!(body["data"][1]["name"], json!("Alice"));
    assert_eq!(body["hasMore"], json!(true));
}

#[tokio::test]
async fn test_unique_values() {
    let dir = create_temp_dir();
    write_maintenance_parquet(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        viewer("unique-values"),
        json!({"path": "maintenance.parquet", "columnName": "is_maintenance"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["values"], json!(["0", "1"]));
    assert_eq!(body["counts"], json!([9, 4]));
    assert_eq!(body["total_count"], json!(2));
}

#[tokio::test]
async fn test_column_stats() {
    let dir = create_temp_dir();
    write_people_csv(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        viewer("column-stats"),
        json!({"path": "people.csv", "columnName": "city"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_rows"], json!(4));
    assert_eq!(body["null_count"], json!(1));
    assert_eq!(body["most_common_value"], json!("Paris"));
    assert_eq!(body["most_common_count"], json!(2));
}

#[tokio::test]
async fn test_parquet_only_data() {
    let dir = create_temp_dir();
    write_maintenance_parquet(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        parquet("data"),
        json!({"path": "maintenance.parquet", "limit": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert!(body["data"][0].get("__row_index__").is_none());
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_missing_path_is_bad_request() {
    let dir = create_temp_dir();
    let (status, body) = post(router_for(dir.path()), viewer("metadata"), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], json!("MissingParameter"));
}

#[tokio::test]
async fn test_empty_body_is_missing_path() {
    let dir = create_temp_dir();
    let (status, body) = post_raw(router_for(dir.path()), viewer("data"), Body::empty()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], json!("MissingParameter"));
}

#[tokio::test]
async fn test_malformed_body() {
    let dir = create_temp_dir();
    let (status, body) = post_raw(
        router_for(dir.path()),
        viewer("data"),
        Body::from("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], json!("InvalidBody"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = create_temp_dir();
    let (status, body) = post(
        router_for(dir.path()),
        viewer("metadata"),
        json!({"path": "ghost.csv"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], json!("PathNotFound"));
}

#[tokio::test]
async fn test_unsupported_extension() {
    let dir = create_temp_dir();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let (status, body) = post(
        router_for(dir.path()),
        viewer("data"),
        json!({"path": "notes.txt"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], json!("UnsupportedFormat"));
}

#[tokio::test]
async fn test_parquet_only_rejects_csv() {
    let dir = create_temp_dir();
    write_people_csv(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        parquet("metadata"),
        json!({"path": "people.csv"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], json!("UnsupportedFormat"));
    assert_eq!(body["error"], json!("Unsupported file type: csv"));
}

#[tokio::test]
async fn test_stats_unknown_column() {
    let dir = create_temp_dir();
    write_people_csv(dir.path());

    let (status, body) = post(
        router_for(dir.path()),
        viewer("column-stats"),
        json!({"path": "people.csv", "columnName": "salary"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], json!("ColumnNotFound"));
}

#[tokio::test]
async fn test_corrupt_file_is_server_error() {
    let dir = create_temp_dir();
    fs::write(dir.path().join("broken.parquet"), b"nope").unwrap();

    let (status, body) = post(
        router_for(dir.path()),
        viewer("data"),
        json!({"path": "broken.parquet"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], json!("ReadError"));
    assert!(body.get("traceback").is_none());
}

#[tokio::test]
async fn test_path_escaping_root_is_not_found() {
    let outer = create_temp_dir();
    let root = outer.path().join("root");
    fs::create_dir(&root).unwrap();
    write_people_csv(outer.path());

    let (status, _) = post(
        router_for(&root),
        viewer("metadata"),
        json!({"path": "../people.csv"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
