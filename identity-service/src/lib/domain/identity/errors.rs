use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for registration password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Failures reported by a credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Identity already exists: {0}")]
    DuplicateIdentity(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of register and login operations.
///
/// `IdentityAlreadyExists` and `InvalidCredentials` are expected business
/// outcomes. `StorageUnavailable` is a retryable infrastructure failure and
/// `Internal` covers everything else that is not the caller's fault.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Identity already exists: {0}")]
    IdentityAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentity(email) => AuthError::IdentityAlreadyExists(email),
            StoreError::Unavailable(reason) => AuthError::StorageUnavailable(reason),
        }
    }
}
