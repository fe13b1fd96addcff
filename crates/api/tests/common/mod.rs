#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use userhub_api::auth::session::{SessionAuthority, SessionConfig};
use userhub_api::config::{DatabaseConfig, ServerConfig};
use userhub_api::router::build_app_router;
use userhub_api::state::AppState;
use userhub_core::token::TokenKey;

pub const TEST_KEY: [u8; 32] = [42u8; 32];

/// Build a test `ServerConfig` with safe defaults and a fixed token key.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database: DatabaseConfig {
            url: "postgres://unused-in-tests".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
        },
        session: SessionConfig {
            key: TokenKey::from_bytes(TEST_KEY),
            expiration_secs: 3600,
        },
    }
}

/// A session authority sharing the test app's key, for crafting tokens.
pub fn test_sessions() -> SessionAuthority {
    SessionAuthority::new(&test_config().session)
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), &body)).await
}

pub async fn post_form(app: Router, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
    let encoded = fields
        .iter()
        .map(|(k, v)| format!("{}={}", form_escape(k), form_escape(v)))
        .collect::<Vec<_>>()
        .join("&");
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encoded))
        .unwrap();
    send(app, request).await
}

/// Percent-encode everything outside the unreserved set.
fn form_escape(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Register through the API and return the new user id.
pub async fn register(app: Router, name: &str, password: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/user",
        serde_json::json!({ "name": name, "password": password }),
    )
    .await;
    assert_eq!(response.status(), 201, "registering {name} should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, name: &str, password: &str) -> String {
    let response = post_form(
        app,
        "/api/v1/login",
        &[("username", name), ("password", password)],
    )
    .await;
    assert_eq!(response.status(), 200, "login for {name} should succeed");
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}
