use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures keep their cause for diagnostics; callers guarding
/// protected resources should treat all of them as "unauthenticated".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,
}
