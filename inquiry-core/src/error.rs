/// Errors produced by the `inquiry-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The scoped token could not be signed.
    #[error("failed to sign scoped token: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}
