use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
    time::{Duration, SystemTime},
};

use log::{debug, info, warn};
use tokio::sync::Mutex as AsyncMutex;

use crate::{
    error::AuthError,
    identity::VerifiedIdentity,
    issuer::TokenIssuer,
    store::{CredentialStore, NewCredential, StoredCredential},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialState {
    Valid,
    Expired,
}

/// Replaces expired credentials with freshly issued ones.
///
/// A refresh deletes the expired row before asking the issuer for new
/// tokens. If the exchange or the insert fails the user is left without a
/// credential; the old row is never restored.
///
/// Refreshes for the same user are serialized within this process. Other
/// processes sharing the store are not coordinated with.
pub struct CredentialRefresher {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
    environment: String,
    expiration_window: Duration,
    guards: Mutex<HashMap<i64, Weak<AsyncMutex<()>>>>,
}

impl CredentialRefresher {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: Arc<dyn TokenIssuer>,
        environment: impl Into<String>,
        expiration_window: Duration,
    ) -> Self {
        Self {
            store,
            issuer,
            environment: environment.into(),
            expiration_window,
            guards: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self, credential: &StoredCredential, now: SystemTime) -> CredentialState {
        match now.checked_add(self.expiration_window) {
            Some(deadline) if deadline < credential.expires_at => CredentialState::Valid,
            _ => CredentialState::Expired,
        }
    }

    /// Returns `credential` if still valid, otherwise the credential that replaced it.
    pub async fn ensure_fresh(
        &self,
        identity: &VerifiedIdentity,
        credential: StoredCredential,
    ) -> Result<StoredCredential, AuthError> {
        if self.state(&credential, SystemTime::now()) == CredentialState::Valid {
            return Ok(credential);
        }

        let guard = self.guard_for(identity.user_id());
        let _held = guard.lock().await;

        let current = self
            .store
            .fetch_credentials_for_user(identity.user_id())
            .await?
            .into_iter()
            .next()
            .ok_or(AuthError::NoCredentials)?;
        if self.state(&current, SystemTime::now()) == CredentialState::Valid {
            debug!(
                "Credential {} of {} was already replaced by credential {}",
                credential.id,
                identity.username(),
                current.id
            );
            return Ok(current);
        }

        self.replace(identity, current).await
    }

    async fn replace(
        &self,
        identity: &VerifiedIdentity,
        expired: StoredCredential,
    ) -> Result<StoredCredential, AuthError> {
        self.store.delete_credential(expired.id).await?;

        let issued = self
            .issuer
            .refresh(&expired.refresh_token)
            .await
            .map_err(|e| {
                warn!(
                    "Error refreshing access token for {}: {}",
                    identity.username(),
                    e
                );
                AuthError::from(e)
            })?;
        info!("Access token refreshed successfully for {}", identity.username());

        let inserted = self
            .store
            .insert_credential(NewCredential {
                user_id: identity.user_id(),
                access_token: issued.access_token,
                refresh_token: issued.refresh_token,
                expires_at: issued.expires_at,
                environment: self.environment.clone(),
            })
            .await?;
        Ok(inserted)
    }

    fn guard_for(&self, user_id: i64) -> Arc<AsyncMutex<()>> {
        let mut guards = self.guards.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(guard) = guards.get(&user_id).and_then(Weak::upgrade) {
            return guard;
        }
        guards.retain(|_, guard| guard.strong_count() > 0);
        let guard = Arc::new(AsyncMutex::new(()));
        guards.insert(user_id, Arc::downgrade(&guard));
        guard
    }
}
