//! Integration tests: account operations passing through to the identity
//! provider.
//!
//! The provider is mocked; each test checks the REST call shape (path, apikey
//! header, body) and the `{error}` surface returned to the caller.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use inquiry_core::TokenSigner;
use inquiry_gateway::{
    auth::GoTrueAuthClient,
    forwarder::InquiryForwarder,
    routes::{create_router, AppState},
};
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "service-role-key";

fn app_for(identity_base: String) -> Router {
    // The forwarder is unused by these tests; it points at a closed port.
    let signer = TokenSigner::new(identity_base.clone(), b"test-secret");
    let forwarder =
        InquiryForwarder::new("http://127.0.0.1:9/inquiry".to_owned(), String::new(), signer);
    let auth = GoTrueAuthClient::new(identity_base, API_KEY.to_owned());
    create_router(Arc::new(AppState { forwarder, auth: Box::new(auth) }))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = match app.oneshot(req).await {
        Ok(r) => r,
        Err(e) => panic!("handler error: {e}"),
    };
    let status = resp.status();
    let bytes = match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
        Ok(b) => b,
        Err(e) => panic!("failed to read body: {e}"),
    };
    let body: Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("invalid JSON response: {e}"),
    };
    (status, body)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    match Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
    {
        Ok(r) => r,
        Err(e) => panic!("failed to build request: {e}"),
    }
}

#[tokio::test]
async fn register_posts_signup_with_apikey() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/signup")
                .header("apikey", API_KEY)
                .json_body_partial(
                    r#"{"email":"new@example.com","password":"hunter22","phone":"5551234567"}"#,
                );
            then.status(200).json_body(json!({ "id": "user-1" }));
        })
        .await;

    let (status, body) = send(
        app_for(server.base_url()),
        post_json(
            "/api/auth/register",
            r#"{"email":"new@example.com","password":"hunter22","phone":"5551234567"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn login_success_returns_provider_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/token")
                .query_param("grant_type", "password")
                .header("apikey", API_KEY);
            then.status(200).json_body(json!({ "access_token": "jwt", "token_type": "bearer" }));
        })
        .await;

    let (status, body) = send(
        app_for(server.base_url()),
        post_json("/api/auth/login", r#"{"email":"u@example.com","password":"hunter22"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["session"]["access_token"], "jwt");
}

#[tokio::test]
async fn login_failure_passes_provider_message_and_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(400).json_body(json!({ "error_description": "Invalid login credentials" }));
        })
        .await;

    let (status, body) = send(
        app_for(server.base_url()),
        post_json("/api/auth/login", r#"{"email":"u@example.com","password":"wrong"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid login credentials");
}

#[tokio::test]
async fn reset_password_carries_update_password_redirect() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/recover")
                .header("apikey", API_KEY)
                .query_param("redirect_to", "https://example.com/auth/update-password")
                .json_body(json!({ "email": "u@example.com" }));
            then.status(200).json_body(json!({}));
        })
        .await;

    let (status, body) = send(
        app_for(server.base_url()),
        post_json(
            "/api/auth/reset-password",
            r#"{"email":"u@example.com","redirect_to":"https://example.com/auth/update-password"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn reset_password_without_redirect_uses_provider_default() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/recover")
                .header("apikey", API_KEY)
                .json_body(json!({ "email": "u@example.com" }));
            then.status(200).json_body(json!({}));
        })
        .await;

    let (status, body) = send(
        app_for(server.base_url()),
        post_json("/api/auth/reset-password", r#"{"email":"u@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn update_password_puts_user_with_bearer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/auth/v1/user")
                .header("apikey", API_KEY)
                .header("authorization", "Bearer session-token")
                .json_body(json!({ "password": "new-password" }));
            then.status(200).json_body(json!({}));
        })
        .await;

    let req = match Request::builder()
        .method("POST")
        .uri("/api/auth/update-password")
        .header("content-type", "application/json")
        .header("authorization", "Bearer session-token")
        .body(Body::from(r#"{"password":"new-password"}"#))
    {
        Ok(r) => r,
        Err(e) => panic!("failed to build request: {e}"),
    };
    let (status, body) = send(app_for(server.base_url()), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn logout_posts_logout_and_tolerates_empty_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/v1/logout")
                .header("authorization", "Bearer session-token");
            then.status(204);
        })
        .await;

    let req = match Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header("authorization", "Bearer session-token")
        .body(Body::empty())
    {
        Ok(r) => r,
        Err(e) => panic!("failed to build request: {e}"),
    };
    let (status, body) = send(app_for(server.base_url()), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_provider_maps_to_503() {
    let (status, body) = send(
        app_for("http://127.0.0.1:9".to_owned()),
        post_json("/api/auth/reset-password", r#"{"email":"u@example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Unable to reach authentication service");
}
