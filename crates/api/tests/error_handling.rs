//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use userhub_api::error::AppError;
use userhub_core::error::{AuthFailure, CoreError};
use userhub_db::StoreError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "User",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 4);
    assert_eq!(json["msg"], "User with id 42 not found");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("login failed".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 1);
    assert_eq!(json["msg"], "login failed");
}

#[tokio::test]
async fn conflict_and_validation_return_400_with_distinct_codes() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("name taken".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 3);

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("too short".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 2);
    assert_eq!(json["msg"], "too short");
}

#[tokio::test]
async fn forbidden_returns_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("admins only".into()))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], 5);
}

#[tokio::test]
async fn unauthorized_variants_carry_challenge_and_sub_codes() {
    for (failure, code) in [
        (AuthFailure::NotAuthenticated, 10),
        (AuthFailure::InvalidToken, 11),
        (AuthFailure::ExpiredToken, 12),
    ] {
        let response = AppError::unauthorized(failure).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], code);
        assert_eq!(json["msg"], failure.to_string());
    }
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret detail".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], 50);
    assert_eq!(json["msg"], "An internal error occurred");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("boom".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["msg"], "An internal error occurred");
}

#[tokio::test]
async fn store_misuse_is_internal() {
    let (status, json) = error_to_response(AppError::Store(StoreError::EmptyValues)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], 50);
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 4);
}

#[tokio::test]
async fn pool_timeout_is_internal() {
    let (status, json) =
        error_to_response(AppError::Store(StoreError::Sql(sqlx::Error::PoolTimedOut))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], 50);
}

#[tokio::test]
async fn panic_response_is_json_500() {
    let response = userhub_api::error::panic_response(Box::new("kaboom"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], 50);
}
