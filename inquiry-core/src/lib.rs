//! Core types for the contact-inquiry relay.
//!
//! Defines the contact-submission model, its field validation rules, and the
//! limited-scope token minted for calls to the external intake API.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod submission;
pub mod token;

pub use error::CoreError;
pub use submission::{ContactSubmission, FieldError, SubmissionDraft};
pub use token::{
    MintedToken, ScopedTokenClaims, TokenIdentity, TokenSigner, TOKEN_AUDIENCE, TOKEN_SCOPE,
    TOKEN_SUBJECT, TOKEN_TTL_SECS,
};
