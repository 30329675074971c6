//! Limited-scope token minting for the external intake API.
//!
//! Every forwarded inquiry carries a fresh HS256 token scoped to the single
//! `contact:submit` capability. Tokens are short-lived, never persisted, and
//! carry only the three identity claims — never the phone number or message
//! body.

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::{error::CoreError, submission::ContactSubmission};

/// Audience claim naming the external intake API.
pub const TOKEN_AUDIENCE: &str = "external-api";

/// Subject claim naming the flow the token authorizes.
pub const TOKEN_SUBJECT: &str = "contact-form";

/// The single capability a minted token grants.
pub const TOKEN_SCOPE: &str = "contact:submit";

/// Token lifetime in seconds (5 minutes).
pub const TOKEN_TTL_SECS: i64 = 5 * 60;

/// Identity claims embedded in a scoped token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub name: String,
    pub email: String,
    pub service: String,
}

impl From<&ContactSubmission> for TokenIdentity {
    fn from(submission: &ContactSubmission) -> Self {
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            service: submission.service.clone(),
        }
    }
}

/// Full claim set of a scoped token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopedTokenClaims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch), always `iat` + [`TOKEN_TTL_SECS`].
    pub exp: i64,
    pub scope: Vec<String>,
    pub user: TokenIdentity,
}

/// A freshly minted token together with its validity window.
#[derive(Debug, Clone)]
pub struct MintedToken {
    /// The encoded JWT, sent as the bearer credential.
    pub jwt: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl MintedToken {
    /// ISO-8601 expiry string carried in the `X-Token-Expires` header.
    #[must_use]
    pub fn expires_at_iso(&self) -> String {
        self.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Signs limited-scope tokens with the server-held secret.
///
/// Minting is synchronous and CPU-only; the secret never leaves the process.
pub struct TokenSigner {
    issuer: String,
    key: EncodingKey,
}

impl TokenSigner {
    #[must_use]
    pub fn new(issuer: impl Into<String>, secret: &[u8]) -> Self {
        Self { issuer: issuer.into(), key: EncodingKey::from_secret(secret) }
    }

    /// Mint a token for one intake call, valid for [`TOKEN_TTL_SECS`] from `now`.
    ///
    /// # Errors
    /// Returns [`CoreError::TokenSigning`] if JWT encoding fails.
    pub fn mint(
        &self,
        identity: &TokenIdentity,
        now: DateTime<Utc>,
    ) -> Result<MintedToken, CoreError> {
        let iat = now.timestamp();
        let exp = iat + TOKEN_TTL_SECS;

        let claims = ScopedTokenClaims {
            aud: TOKEN_AUDIENCE.to_owned(),
            iss: self.issuer.clone(),
            sub: TOKEN_SUBJECT.to_owned(),
            iat,
            exp,
            scope: vec![TOKEN_SCOPE.to_owned()],
            user: identity.clone(),
        };

        let jwt = encode(&Header::new(Algorithm::HS256), &claims, &self.key)?;

        Ok(MintedToken {
            jwt,
            issued_at: now,
            expires_at: now + TimeDelta::seconds(TOKEN_TTL_SECS),
        })
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The encoding key is deliberately not printable.
        f.debug_struct("TokenSigner").field("issuer", &self.issuer).finish_non_exhaustive()
    }
}
