//! Pass-through client for the external identity provider.
//!
//! The gateway adds no logic beyond parameter shaping: token issuance, session
//! storage, and credential verification all belong to the provider. Handlers
//! receive an [`AuthClient`] by injection; there is no ambient global.

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Errors surfaced by the auth pass-through.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The identity provider rejected the call.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// The identity provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Transport(#[source] reqwest::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Provider { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                Json(json!({ "error": message })),
            )
                .into_response(),
            AuthError::Transport(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Unable to reach authentication service" })),
            )
                .into_response(),
        }
    }
}

/// OAuth providers the login page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OauthProvider {
    Google,
    Github,
    Facebook,
    Discord,
}

impl OauthProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OauthProvider::Google => "google",
            OauthProvider::Github => "github",
            OauthProvider::Facebook => "facebook",
            OauthProvider::Discord => "discord",
        }
    }
}

impl FromStr for OauthProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(OauthProvider::Google),
            "github" => Ok(OauthProvider::Github),
            "facebook" => Ok(OauthProvider::Facebook),
            "discord" => Ok(OauthProvider::Discord),
            _ => Err(()),
        }
    }
}

/// Capability surface of the external identity provider.
///
/// Thin pass-throughs only: each method maps one-to-one onto a provider REST
/// call and returns either success or the provider's own error message.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Create an account. The optional phone number is forwarded verbatim.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<(), AuthError>;

    /// Password sign-in. Returns the provider's session payload.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Value, AuthError>;

    /// Authorization URL the browser should redirect to for an OAuth sign-in.
    fn oauth_authorize_url(&self, provider: OauthProvider, redirect_to: Option<&str>) -> String;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Send a password-recovery email. `redirect_to` is the update-password
    /// page the recovery link should land on; the provider default applies
    /// when absent.
    async fn reset_password(&self, email: &str, redirect_to: Option<&str>)
        -> Result<(), AuthError>;

    /// Set a new password on the session behind `access_token`.
    async fn update_password(&self, access_token: &str, password: &str) -> Result<(), AuthError>;
}

#[derive(Debug, Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

/// [`AuthClient`] backed by a GoTrue-compatible identity provider's REST API.
pub struct GoTrueAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoTrueAuthClient {
    /// `base_url` is the identity-provider base without a trailing slash.
    #[must_use]
    pub fn new(base_url: String, api_key: String) -> Self {
        Self { http: reqwest::Client::new(), base_url, api_key }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// Run a provider call to completion, mapping non-success responses to
    /// [`AuthError::Provider`] with the provider's own message.
    async fn finish(&self, request: reqwest::RequestBuilder) -> Result<Value, AuthError> {
        let response =
            request.header("apikey", &self.api_key).send().await.map_err(AuthError::Transport)?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            Ok(body)
        } else {
            Err(AuthError::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            })
        }
    }
}

/// Pull a human-readable message out of a GoTrue error body, whichever of its
/// historical shapes the provider used.
fn provider_message(body: &Value) -> String {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .unwrap_or("Authentication request failed")
        .to_owned()
}

#[async_trait]
impl AuthClient for GoTrueAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<(), AuthError> {
        let body = SignUpBody { email, password, phone };
        self.finish(self.http.post(self.endpoint("signup")).json(&body)).await.map(|_| ())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Value, AuthError> {
        self.finish(
            self.http
                .post(self.endpoint("token"))
                .query(&[("grant_type", "password")])
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    fn oauth_authorize_url(&self, provider: OauthProvider, redirect_to: Option<&str>) -> String {
        let mut url = format!("{}?provider={}", self.endpoint("authorize"), provider.as_str());
        if let Some(target) = redirect_to {
            url.push_str("&redirect_to=");
            url.push_str(&urlencode(target));
        }
        url
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.finish(self.http.post(self.endpoint("logout")).bearer_auth(access_token))
            .await
            .map(|_| ())
    }

    async fn reset_password(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut request = self.http.post(self.endpoint("recover"));
        if let Some(target) = redirect_to {
            request = request.query(&[("redirect_to", target)]);
        }
        self.finish(request.json(&json!({ "email": email }))).await.map(|_| ())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> Result<(), AuthError> {
        self.finish(
            self.http
                .put(self.endpoint("user"))
                .bearer_auth(access_token)
                .json(&json!({ "password": password })),
        )
        .await
        .map(|_| ())
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl fmt::Debug for GoTrueAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoTrueAuthClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}
