use async_trait::async_trait;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::IssuedToken;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::User;

/// Port for authentication operations exposed to the transport layer.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token.
    ///
    /// # Errors
    /// * `IdentityAlreadyExists` - Email is already registered (also on a lost race)
    /// * `StorageUnavailable` - Credential store failed or timed out
    /// * `Internal` - Hashing or token signing failed
    async fn register(&self, command: RegisterCommand) -> Result<IssuedToken, AuthError>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `StorageUnavailable` - Credential store failed or timed out
    /// * `Internal` - Hashing or token signing failed
    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AuthError>;

    /// Validate a bearer token without touching storage.
    fn validate_token(&self, token: &str) -> Result<auth::Claims, auth::TokenError>;
}

/// Durable mapping from normalised email to user record.
///
/// Implementations must enforce email uniqueness at write time: `create` for
/// an email that already exists fails with `DuplicateIdentity`, even when two
/// calls race.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Backend operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;

    /// Persist a new user, assigning its id.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already registered
    /// * `Unavailable` - Backend operation failed
    async fn create(&self, email: &EmailAddress, password_hash: &str) -> Result<User, StoreError>;
}
