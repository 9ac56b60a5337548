use std::{
    fmt,
    time::{Duration, SystemTime},
};

use url::Url;

use crate::{error::StartupError, validation::ClaimsValidationSpec};

pub const DEFAULT_TOKEN_PATH: &str = "/oauth/token";
pub const DEFAULT_ENVIRONMENT: &str = "prod";

/// OAuth2 client used to refresh stored credentials.
#[derive(Clone, PartialEq)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
}

impl fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url.as_str())
            .finish()
    }
}

/// Everything an authorizer needs, fixed for its lifetime.
#[derive(Clone)]
pub struct AuthorizerConfig {
    pub oauth: OAuthClientConfig,
    pub signing_secret: String,
    pub environment: String,
    pub expiration_window: Duration,
    pub claims_validation_spec: ClaimsValidationSpec,
}

impl fmt::Debug for AuthorizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizerConfig")
            .field("oauth", &self.oauth)
            .field("signing_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("expiration_window", &self.expiration_window)
            .field("claims_validation_spec", &self.claims_validation_spec)
            .finish()
    }
}

impl AuthorizerConfig {
    pub fn builder() -> AuthorizerConfigBuilder {
        AuthorizerConfigBuilder::new()
    }

    /// Reads the configuration from process environment variables.
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `EDL_ROOT` | token host, e.g. `https://urs.earthdata.nasa.gov` |
    /// | `EDL_TOKEN_PATH` | token endpoint path, defaults to `/oauth/token` |
    /// | `EDL_CLIENT_ID` | OAuth client id |
    /// | `EDL_PASSWORD` | OAuth client secret |
    /// | `JWT_SECRET` | secret signing the bearer tokens |
    /// | `CMR_ENV` | deployment environment, defaults to `prod` |
    /// | `EDL_EXPIRATION_WINDOW_SECS` | seconds before expiry a credential counts as expired |
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| StartupError::MissingParameter(name.to_owned()))
        };

        let mut builder = AuthorizerConfigBuilder::new()
            .token_host(required("EDL_ROOT")?)
            .client_id(required("EDL_CLIENT_ID")?)
            .client_secret(required("EDL_PASSWORD")?)
            .signing_secret(required("JWT_SECRET")?);
        if let Some(token_path) = lookup("EDL_TOKEN_PATH") {
            builder = builder.token_path(token_path);
        }
        if let Some(environment) = lookup("CMR_ENV") {
            builder = builder.environment(environment);
        }
        if let Some(window) = lookup("EDL_EXPIRATION_WINDOW_SECS") {
            let seconds = window.trim().parse::<u64>().map_err(|_| {
                StartupError::InvalidParameter(
                    "EDL_EXPIRATION_WINDOW_SECS must be a number of seconds".to_owned(),
                )
            })?;
            builder = builder.expiration_window(Duration::from_secs(seconds));
        }
        builder.build()
    }
}

#[derive(Default)]
pub struct AuthorizerConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    token_host: Option<String>,
    token_path: Option<String>,
    signing_secret: Option<String>,
    environment: Option<String>,
    expiration_window: Option<Duration>,
    claims_validation_spec: Option<ClaimsValidationSpec>,
}

impl AuthorizerConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the scheme and host of the token issuer.
    ///
    /// Joined with [token_path](Self::token_path) to form the token endpoint.
    pub fn token_host(mut self, token_host: impl Into<String>) -> Self {
        self.token_host = Some(token_host.into());
        self
    }

    /// Default value is `/oauth/token`.
    pub fn token_path(mut self, token_path: impl Into<String>) -> Self {
        self.token_path = Some(token_path.into());
        self
    }

    /// Set the secret that bearer tokens are signed with.
    pub fn signing_secret(mut self, signing_secret: impl Into<String>) -> Self {
        self.signing_secret = Some(signing_secret.into());
        self
    }

    /// Set the environment that refreshed credentials are tagged with.
    ///
    /// Default value is `prod`.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Treat credentials expiring within `window` as already expired.
    ///
    /// Default value is `Duration::ZERO`.
    pub fn expiration_window(mut self, window: Duration) -> Self {
        self.expiration_window = Some(window);
        self
    }

    /// Set what claims of bearer tokens to validate.
    ///
    /// By default `exp` and `nbf` are validated when present and nothing is required.
    pub fn claims_validation(mut self, claims_validation: ClaimsValidationSpec) -> Self {
        self.claims_validation_spec = Some(claims_validation);
        self
    }

    pub fn build(self) -> Result<AuthorizerConfig, StartupError> {
        let client_id = self
            .client_id
            .ok_or_else(|| StartupError::MissingParameter("client_id".to_owned()))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| StartupError::MissingParameter("client_secret".to_owned()))?;
        let token_host = self
            .token_host
            .ok_or_else(|| StartupError::MissingParameter("token_host".to_owned()))?;
        let signing_secret = self
            .signing_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| StartupError::MissingParameter("signing_secret".to_owned()))?;

        let expiration_window = self.expiration_window.unwrap_or(Duration::ZERO);
        if SystemTime::now().checked_add(expiration_window).is_none() {
            return Err(StartupError::InvalidParameter(
                "expiration_window is out of range".to_owned(),
            ));
        }

        let token_url = token_url(
            &token_host,
            self.token_path.as_deref().unwrap_or(DEFAULT_TOKEN_PATH),
        )?;

        Ok(AuthorizerConfig {
            oauth: OAuthClientConfig {
                client_id,
                client_secret,
                token_url,
            },
            signing_secret,
            environment: self
                .environment
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned()),
            expiration_window,
            claims_validation_spec: self.claims_validation_spec.unwrap_or_default(),
        })
    }
}

fn token_url(token_host: &str, token_path: &str) -> Result<Url, StartupError> {
    let host = Url::parse(token_host)
        .map_err(|_| StartupError::InvalidParameter("Invalid token_host format".to_owned()))?;
    if host.cannot_be_a_base() {
        return Err(StartupError::InvalidParameter(
            "Invalid token_host format".to_owned(),
        ));
    }
    host.join(token_path)
        .map_err(|_| StartupError::InvalidParameter("Invalid token_path format".to_owned()))
}
