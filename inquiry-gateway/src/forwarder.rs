//! Outbound relay to the external inquiry-intake API.
//!
//! One attempt per incoming request. Transient failures surface to the caller
//! rather than being retried; the intake service performs no deduplication, so
//! the gateway deliberately adds none either.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use inquiry_core::{ContactSubmission, TokenIdentity, TokenSigner};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::error::RelayError;

/// Outbound payload: the validated fields plus the server-side submission time.
#[derive(Debug, Serialize)]
struct InquiryPayload<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    service: &'a str,
    message: &'a str,
    timestamp: String,
}

/// Relays validated submissions to the intake API with a freshly minted
/// limited-scope token.
pub struct InquiryForwarder {
    http: reqwest::Client,
    inquiry_url: String,
    project_ref: String,
    signer: TokenSigner,
}

impl InquiryForwarder {
    #[must_use]
    pub fn new(inquiry_url: String, project_ref: String, signer: TokenSigner) -> Self {
        Self { http: reqwest::Client::new(), inquiry_url, project_ref, signer }
    }

    /// Mint a scoped token and forward the submission to the intake API.
    ///
    /// On success returns the intake service's JSON body, which is passed
    /// through to the browser untouched.
    ///
    /// # Errors
    /// - [`RelayError::Network`] when the outbound call never completes.
    /// - [`RelayError::Upstream`] when the intake service answers non-success.
    /// - [`RelayError::Internal`] when minting fails or the success body is not
    ///   JSON.
    pub async fn forward(&self, submission: &ContactSubmission) -> Result<Value, RelayError> {
        let token = self.signer.mint(&TokenIdentity::from(submission), Utc::now())?;
        let payload = InquiryPayload {
            name: &submission.name,
            email: &submission.email,
            phone: &submission.phone,
            service: &submission.service,
            message: &submission.message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let response = self
            .http
            .post(&self.inquiry_url)
            .header("Authorization", format!("Bearer {}", token.jwt))
            .header("X-Token-Type", "limited-scope-jwt")
            .header("X-Token-Expires", token.expires_at_iso())
            .header("X-Supabase-Project-Ref", self.project_ref.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "unable to reach intake service");
                RelayError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                status_text = status.canonical_reason().unwrap_or_default(),
                submission = ?submission,
                "intake service rejected inquiry"
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let timestamp = payload.timestamp.clone();
        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::Internal(format!("invalid JSON from intake service: {e}")))?;

        info!(
            submission = ?submission,
            timestamp = %timestamp,
            response = %body,
            "contact inquiry forwarded"
        );
        Ok(body)
    }
}

impl fmt::Debug for InquiryForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InquiryForwarder")
            .field("inquiry_url", &self.inquiry_url)
            .field("project_ref", &self.project_ref)
            .finish_non_exhaustive()
    }
}
