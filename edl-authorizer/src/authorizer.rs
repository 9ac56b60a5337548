use core::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    error::{AuthError, Unauthorized},
    event::AuthorizerEvent,
    jwt_extract::JwtExtractor,
    policy::{generate_policy, Decision, Effect},
    refresh::CredentialRefresher,
    store::CredentialStore,
    verifier::SignatureVerifier,
    warmup::WarmUpFilter,
};

/// Authorizer
///
/// Verifies the bearer token of an [AuthorizerEvent], makes sure the caller
/// holds an unexpired third-party credential and produces an `Allow`
/// [Decision] for the requested resource.
///
/// Construct it with [Authorizer::builder](crate::builder::AuthorizerBuilder).
#[derive(Clone)]
pub struct Authorizer {
    pub(crate) jwt_extractor: Arc<dyn JwtExtractor + Send + Sync>,
    pub(crate) verifier: Arc<dyn SignatureVerifier>,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) refresher: Arc<CredentialRefresher>,
    pub(crate) warm_up_filter: Arc<dyn WarmUpFilter>,
}

impl Authorizer {
    /// Entry point for a gateway invocation.
    ///
    /// Keep-alive invocations yield `Ok(None)` without any authorization
    /// work. Everything else is passed to [authorize](Self::authorize).
    pub async fn handle(&self, event: &AuthorizerEvent) -> Result<Option<Decision>, Unauthorized> {
        if self.warm_up_filter.is_warm_up(event) {
            debug!("Skipping warm up invocation");
            return Ok(None);
        }
        self.authorize(event).await.map(Some)
    }

    /// Allows the request or fails with [Unauthorized].
    ///
    /// The reason for a denial is logged, never returned.
    pub async fn authorize(&self, event: &AuthorizerEvent) -> Result<Decision, Unauthorized> {
        self.authorize_event(event).await.map_err(|e| {
            log_denial(&e);
            Unauthorized::from(e)
        })
    }

    pub(crate) async fn authorize_event(
        &self,
        event: &AuthorizerEvent,
    ) -> Result<Decision, AuthError> {
        let token = self.jwt_extractor.extract_jwt(event)?;
        let identity = self.verifier.verify(&token)?;
        debug!("JWT validation successful for {}", identity.username());

        let newest = self
            .store
            .fetch_credentials_for_user(identity.user_id())
            .await?
            .into_iter()
            .next()
            .ok_or(AuthError::NoCredentials)?;

        let credential = self.refresher.ensure_fresh(&identity, newest).await?;
        debug!(
            "Using credential {} for {}",
            credential.id,
            identity.username()
        );

        Ok(generate_policy(
            identity.username(),
            identity.token(),
            Some(Effect::Allow),
            Some(&event.method_arn),
        ))
    }
}

fn log_denial(error: &AuthError) {
    match error {
        AuthError::MissingToken | AuthError::InvalidAuthorizationHeader => {
            debug!("Bearer token extraction failed: {}", error)
        }
        AuthError::InvalidSignature { .. } => info!("JWT Token Invalid. {}", error),
        AuthError::NoCredentials => info!("No stored credentials for verified user"),
        AuthError::RefreshFailed(_) | AuthError::StoreUnavailable(_) => {
            warn!("Authorizer error: {}", error)
        }
    }
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer").finish()
    }
}
