use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::identity::errors::StoreError;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::User;
use crate::domain::identity::models::UserId;
use crate::domain::identity::ports::CredentialStore;

/// Process-local credential store.
///
/// The uniqueness check and the insert happen under one write lock.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email.as_str()).cloned())
    }

    async fn create(&self, email: &EmailAddress, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.contains_key(email.as_str()) {
            return Err(StoreError::DuplicateIdentity(email.to_string()));
        }

        let user = User {
            id: UserId::new(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(email.as_str().to_string(), user.clone());

        Ok(user)
    }
}
