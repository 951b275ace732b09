use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::identity::errors::AuthError;
use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::IssuedToken;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::ports::AuthenticationServicePort;
use crate::domain::identity::ports::CredentialStore;

/// Domain service orchestrating registration and login.
///
/// Store calls are bounded by `storage_timeout`; Argon2 work runs on the
/// blocking pool so request workers are not stalled by it.
pub struct AuthenticationService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
    storage_timeout: Duration,
}

impl<CS> AuthenticationService<CS>
where
    CS: CredentialStore,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hasher and token codec pair
    /// * `storage_timeout` - Upper bound for each store call
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>, storage_timeout: Duration) -> Self {
        Self {
            store,
            authenticator,
            storage_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.storage_timeout, call).await {
            Ok(result) => result.map_err(|e| {
                if let StoreError::Unavailable(reason) = &e {
                    tracing::error!(operation, reason = %reason, "Credential store failed");
                }
                AuthError::from(e)
            }),
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_ms = self.storage_timeout.as_millis() as u64,
                    "Credential store timed out"
                );
                Err(AuthError::StorageUnavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.storage_timeout
                )))
            }
        }
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| AuthError::Internal(format!("Credential worker failed: {}", e)))
    }
}

#[async_trait]
impl<CS> AuthenticationServicePort for AuthenticationService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<IssuedToken, AuthError> {
        let RegisterCommand { email, password } = command;

        if self
            .bounded("find_by_email", self.store.find_by_email(&email))
            .await?
            .is_some()
        {
            tracing::warn!(email = %email, "Registration rejected: email already registered");
            return Err(AuthError::IdentityAlreadyExists(email.to_string()));
        }

        let password_hash = self
            .run_blocking(move |authenticator| authenticator.hash_password(password.expose()))
            .await?
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self
            .bounded("create", self.store.create(&email, &password_hash))
            .await
            .map_err(|e| {
                if matches!(e, AuthError::IdentityAlreadyExists(_)) {
                    tracing::warn!(email = %email, "Registration lost race for email");
                }
                e
            })?;

        let access_token = self
            .authenticator
            .issue_token(user.email.as_str())
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(IssuedToken { access_token })
    }

    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AuthError> {
        let LoginCommand { email, password } = command;

        let stored_hash = self
            .bounded("find_by_email", self.store.find_by_email(&email))
            .await?
            .map(|user| user.password_hash);

        let subject = email.as_str().to_string();
        let outcome = self
            .run_blocking(move |authenticator| {
                authenticator.authenticate(password.expose(), stored_hash.as_deref(), &subject)
            })
            .await?;

        match outcome {
            Ok(result) => {
                tracing::info!(email = %email, "User logged in");
                Ok(IssuedToken {
                    access_token: result.access_token,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(email = %email, "Login rejected: invalid credentials");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => Err(AuthError::Internal(e.to_string())),
        }
    }

    fn validate_token(&self, token: &str) -> Result<auth::Claims, auth::TokenError> {
        self.authenticator.validate_token(token)
    }
}
