//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["pool"]["max"], 5);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns the 404 envelope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], 4);
    assert_eq!(json["msg"], "Not Found");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/hello/there").await;

    assert_eq!(response.status(), StatusCode::OK);

    let id_str = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header")
        .to_str()
        .unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/user")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .expect("Missing Access-Control-Allow-Origin header"),
        "http://localhost:5173"
    );
    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("PATCH"),
        "Allow-Methods should contain PATCH, got: {allow_methods}"
    );
}

// ---------------------------------------------------------------------------
// Test: GET JSON responses carry an ETag and honour If-None-Match
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn etag_round_trip_returns_304_on_match(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/hello/etag").await;
    assert_eq!(response.status(), StatusCode::OK);
    let tag = response
        .headers()
        .get("etag")
        .expect("GET JSON response must carry an ETag")
        .to_str()
        .unwrap()
        .to_string();
    assert!(tag.starts_with('"') && tag.ends_with('"'));
    assert_eq!(body_json(response).await["msg"], "Hello, etag!");

    let request = Request::builder()
        .uri("/api/v1/hello/etag")
        .header("If-None-Match", &tag)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers().get("etag").unwrap(), tag.as_str());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty(), "304 must not carry a body");

    // A different resource does not match the old tag.
    let request = Request::builder()
        .uri("/api/v1/hello/other")
        .header("If-None-Match", &tag)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(response.headers().get("etag").unwrap(), tag.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn etag_is_not_added_to_errors_or_writes(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/user/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("etag").is_none());

    let response = common::post_json(
        app,
        "/api/v1/user",
        serde_json::json!({ "name": "tagless", "password": "secret" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get("etag").is_none());
}
