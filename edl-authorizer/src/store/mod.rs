use std::{fmt, time::SystemTime};

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::StoreError;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

/// One issued set of third-party tokens for a user.
#[derive(Clone, PartialEq)]
pub struct StoredCredential {
    pub id: i64,
    pub user_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: SystemTime,
    pub created_at: SystemTime,
}

/// A credential about to be written. The store assigns `id` and `created_at`.
#[derive(Clone, PartialEq)]
pub struct NewCredential {
    pub user_id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: SystemTime,
    pub environment: String,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Persistence of users' third-party credentials.
///
/// Rows are never updated in place. A refresh deletes the old row and
/// inserts a new one.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All credentials of `user_id`, newest first.
    async fn fetch_credentials_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<StoredCredential>, StoreError>;

    async fn delete_credential(&self, id: i64) -> Result<(), StoreError>;

    async fn insert_credential(
        &self,
        credential: NewCredential,
    ) -> Result<StoredCredential, StoreError>;
}
