//! Environment-backed configuration, loaded once at startup.
//!
//! Required values missing means the process exits before binding the
//! listener; nothing is re-read per request.

use std::env;

use tracing::info;
use url::Url;

/// Production intake endpoint of the external inquiry API.
pub const DEFAULT_INQUIRY_API_URL: &str = "https://api.illustrious.cloud/inquiry";

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable was present but did not parse as a URL.
    #[error("environment variable {var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Runtime configuration for the relay gateway.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Identity-provider base URL: token issuer, auth pass-through target, and
    /// the source of the project reference header.
    pub identity_url: Url,
    /// Service key: HS256 signing secret and identity-provider `apikey`.
    pub service_key: String,
    /// Intake endpoint inquiries are forwarded to.
    pub inquiry_api_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    /// Returns an error when `IDENTITY_URL` or `IDENTITY_SERVICE_KEY` is
    /// missing or malformed; callers are expected to abort startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let identity_raw = require("IDENTITY_URL")?;
        let identity_url = Url::parse(&identity_raw)
            .map_err(|source| ConfigError::InvalidUrl { var: "IDENTITY_URL", source })?;
        let service_key = require("IDENTITY_SERVICE_KEY")?;

        Ok(Self {
            listen_addr: optional("RELAY_LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            identity_url,
            service_key,
            inquiry_api_url: optional("INQUIRY_API_URL", DEFAULT_INQUIRY_API_URL),
        })
    }

    /// Project reference carried in `X-Supabase-Project-Ref`: the first host
    /// label of the identity URL, or the empty string when none can be derived.
    #[must_use]
    pub fn project_ref(&self) -> String {
        self.identity_url
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or_default()
            .to_owned()
    }

    /// Identity-provider base URL without a trailing slash, for joining REST
    /// paths and for the token issuer claim.
    #[must_use]
    pub fn identity_base(&self) -> String {
        self.identity_url.as_str().trim_end_matches('/').to_owned()
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    })
}
