//! HTTP relay gateway for contact-inquiry submissions.
//!
//! Validates contact-form payloads at the trust boundary, mints a
//! limited-scope token, and forwards each inquiry to the external intake API
//! with defined error semantics. Account operations pass through to the
//! external identity provider via an injected [`auth::AuthClient`].

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod auth;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod routes;
