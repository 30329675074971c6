//! Axum route handlers for the inquiry relay API.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use inquiry_core::{FieldError, SubmissionDraft};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{AuthClient, OauthProvider},
    error::RelayError,
    forwarder::InquiryForwarder,
};

// ── Shared state ─────────────────────────────────────────────────────────────

/// Dependencies shared by every handler.
pub struct AppState {
    pub forwarder: InquiryForwarder,
    pub auth: Box<dyn AuthClient>,
}

type SharedState = Arc<AppState>;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    pub email: String,
    /// Update-password page the recovery link should land on.
    #[serde(default)]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordBody {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OauthQuery {
    #[serde(default)]
    pub redirect_to: Option<String>,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router with the given shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/auth/update-password", post(update_password))
        .route("/api/auth/oauth/{provider}", get(oauth_authorize))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// `POST /api/contact` — validate, tokenize, and relay a contact submission.
///
/// The body is parsed by hand rather than through the `Json` extractor: a
/// syntactically invalid body is reported as a 500 internal error (the
/// behavior callers of this endpoint have always observed), while a
/// well-formed body with bad fields is a 400 validation error.
///
/// # Errors
/// Every [`RelayError`] class can surface here; see the error module for the
/// status mapping.
pub async fn submit_contact(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, RelayError> {
    let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "contact request body is not valid JSON");
        RelayError::Internal(format!("request body is not valid JSON: {e}"))
    })?;

    // Valid JSON with wrong-typed fields is a client error, not a server fault.
    let draft: SubmissionDraft = serde_json::from_value(value)
        .map_err(|e| RelayError::Validation(vec![FieldError::new("body", e.to_string())]))?;

    let submission = draft.validate().map_err(RelayError::Validation)?;
    let data = state.forwarder.forward(&submission).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Contact form submitted successfully", "data": data })),
    ))
}

/// `POST /api/auth/register` — create an account with the identity provider.
pub async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterBody>,
) -> Response {
    match state.auth.sign_up(&body.email, &body.password, body.phone.as_deref()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "error": null }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /api/auth/login` — password sign-in; returns the provider session.
pub async fn login(State(state): State<SharedState>, Json(body): Json<LoginBody>) -> Response {
    match state.auth.sign_in(&body.email, &body.password).await {
        Ok(session) => {
            (StatusCode::OK, Json(json!({ "error": null, "session": session }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// `POST /api/auth/logout` — revoke the bearer session.
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return missing_bearer();
    };
    match state.auth.sign_out(token).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "error": null }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /api/auth/reset-password` — send a recovery email.
pub async fn reset_password(
    State(state): State<SharedState>,
    Json(body): Json<ResetPasswordBody>,
) -> Response {
    match state.auth.reset_password(&body.email, body.redirect_to.as_deref()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "error": null }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /api/auth/update-password` — set a new password on the bearer session.
pub async fn update_password(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<UpdatePasswordBody>,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return missing_bearer();
    };
    match state.auth.update_password(token, &body.password).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "error": null }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /api/auth/oauth/{provider}` — authorization URL for an OAuth sign-in.
pub async fn oauth_authorize(
    State(state): State<SharedState>,
    Path(provider): Path<String>,
    Query(query): Query<OauthQuery>,
) -> Response {
    let Ok(provider) = provider.parse::<OauthProvider>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unsupported provider '{provider}'") })),
        )
            .into_response();
    };
    let url = state.auth.oauth_authorize_url(provider, query.redirect_to.as_deref());
    (StatusCode::OK, Json(json!({ "url": url }))).into_response()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn missing_bearer() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Missing bearer token" }))).into_response()
}
