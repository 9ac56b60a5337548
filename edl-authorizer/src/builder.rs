use std::{sync::Arc, time::Duration};

use log::info;

use crate::{
    authorizer::Authorizer,
    config::{AuthorizerConfig, DEFAULT_ENVIRONMENT},
    error::StartupError,
    issuer::{OAuth2TokenIssuer, TokenIssuer},
    jwt_extract::{BearerTokenJwtExtractor, JwtExtractor},
    refresh::CredentialRefresher,
    store::CredentialStore,
    verifier::{SharedSecretVerifier, SignatureVerifier},
    warmup::{SourceWarmUpFilter, WarmUpFilter},
};

#[derive(Default)]
pub struct AuthorizerBuilder {
    config: Option<AuthorizerConfig>,
    store: Option<Arc<dyn CredentialStore>>,
    issuer: Option<Arc<dyn TokenIssuer>>,
    verifier: Option<Arc<dyn SignatureVerifier>>,
    jwt_extractor: Option<Arc<dyn JwtExtractor + Send + Sync>>,
    warm_up_filter: Option<Arc<dyn WarmUpFilter>>,
}

impl Authorizer {
    pub fn builder() -> AuthorizerBuilder {
        AuthorizerBuilder::new()
    }
}

impl AuthorizerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    ///
    /// Used to create the signature verifier and the token issuer client
    /// unless those are provided explicitly.
    pub fn config(mut self, config: AuthorizerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set where stored credentials are read from and written to. Required.
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn issuer(mut self, issuer: Arc<dyn TokenIssuer>) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Default is [BearerTokenJwtExtractor].
    pub fn jwt_extractor(mut self, jwt_extractor: Arc<dyn JwtExtractor + Send + Sync>) -> Self {
        self.jwt_extractor = Some(jwt_extractor);
        self
    }

    /// Default is [SourceWarmUpFilter].
    pub fn warm_up_filter(mut self, warm_up_filter: Arc<dyn WarmUpFilter>) -> Self {
        self.warm_up_filter = Some(warm_up_filter);
        self
    }

    pub fn build(self) -> Result<Authorizer, StartupError> {
        let store = self
            .store
            .ok_or_else(|| StartupError::MissingParameter("store".to_owned()))?;

        let verifier = match (self.verifier, &self.config) {
            (Some(verifier), _) => verifier,
            (None, Some(config)) => Arc::new(SharedSecretVerifier::new(
                config.signing_secret.as_bytes(),
                &config.claims_validation_spec,
            )),
            (None, None) => {
                return Err(StartupError::MissingParameter(
                    "config or verifier".to_owned(),
                ))
            }
        };
        let issuer = match (self.issuer, &self.config) {
            (Some(issuer), _) => issuer,
            (None, Some(config)) => Arc::new(OAuth2TokenIssuer::new(config.oauth.clone())),
            (None, None) => {
                return Err(StartupError::MissingParameter(
                    "config or issuer".to_owned(),
                ))
            }
        };

        let (environment, expiration_window) = match &self.config {
            Some(config) => {
                info!(
                    "Authorizer will refresh credentials at {} for environment '{}' and validate the following claims: {}",
                    config.oauth.token_url, config.environment, config.claims_validation_spec
                );
                (config.environment.clone(), config.expiration_window)
            }
            None => (DEFAULT_ENVIRONMENT.to_owned(), Duration::ZERO),
        };

        Ok(Authorizer {
            jwt_extractor: self
                .jwt_extractor
                .unwrap_or_else(|| Arc::new(BearerTokenJwtExtractor)),
            verifier,
            store: store.clone(),
            refresher: Arc::new(CredentialRefresher::new(
                store,
                issuer,
                environment,
                expiration_window,
            )),
            warm_up_filter: self
                .warm_up_filter
                .unwrap_or_else(|| Arc::new(SourceWarmUpFilter)),
        })
    }
}
