//! Process local [CredentialStore].
//!
//! Rows live in a `Vec` behind a mutex and are lost when the process exits.
//! Intended for tests, demos and single instance deployments.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::SystemTime,
};

use async_trait::async_trait;

use crate::error::StoreError;

use super::{CredentialStore, NewCredential, StoredCredential};

#[derive(Default)]
struct Rows {
    next_id: i64,
    credentials: Vec<(StoredCredential, String)>,
}

/// In-memory credential store.
///
/// Cloning is cheap and all clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    rows: Arc<Mutex<Rows>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [StoreError::Unavailable].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inserts a row with an explicit creation time.
    pub fn insert_created_at(
        &self,
        credential: NewCredential,
        created_at: SystemTime,
    ) -> Result<StoredCredential, StoreError> {
        let mut rows = self.rows()?;
        rows.next_id += 1;
        let stored = StoredCredential {
            id: rows.next_id,
            user_id: credential.user_id,
            access_token: credential.access_token,
            refresh_token: credential.refresh_token,
            expires_at: credential.expires_at,
            created_at,
        };
        rows.credentials
            .push((stored.clone(), credential.environment));
        Ok(stored)
    }

    /// Environment tag of the row with `id`, if present.
    pub fn environment_of(&self, id: i64) -> Option<String> {
        self.rows.lock().ok().and_then(|rows| {
            rows.credentials
                .iter()
                .find(|(stored, _)| stored.id == id)
                .map(|(_, environment)| environment.clone())
        })
    }

    pub fn len(&self) -> usize {
        self.rows
            .lock()
            .map(|rows| rows.credentials.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> Result<MutexGuard<'_, Rows>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store marked unavailable".to_owned(),
            ));
        }
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_owned()))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn fetch_credentials_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<StoredCredential>, StoreError> {
        let rows = self.rows()?;
        let mut credentials = rows
            .credentials
            .iter()
            .map(|(stored, _)| stored)
            .filter(|stored| stored.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        credentials.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(credentials)
    }

    async fn delete_credential(&self, id: i64) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        rows.credentials.retain(|(stored, _)| stored.id != id);
        Ok(())
    }

    async fn insert_credential(
        &self,
        credential: NewCredential,
    ) -> Result<StoredCredential, StoreError> {
        self.insert_created_at(credential, SystemTime::now())
    }
}
