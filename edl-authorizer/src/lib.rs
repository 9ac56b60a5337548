#![doc = include_str!("../README.md")]

/// [Authorizer](crate::authorizer::Authorizer) runs the authorization
/// pipeline for a single gateway invocation.
///
/// Verifies the bearer token, selects the caller's newest stored
/// credential, refreshes it when expired and produces an `Allow`
/// [Decision](crate::policy::Decision). Every failure surfaces as
/// [Unauthorized](crate::error::Unauthorized).
pub mod authorizer;

/// Builder used to construct an [Authorizer](crate::authorizer::Authorizer).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use edl_authorizer::authorizer::Authorizer;
/// use edl_authorizer::config::AuthorizerConfig;
/// use edl_authorizer::store::memory::MemoryCredentialStore;
///
/// let config = AuthorizerConfig::builder()
///     .client_id("my-client")
///     .client_secret("my-secret")
///     .token_host("https://urs.earthdata.nasa.gov")
///     .signing_secret("jwt-signing-secret")
///     .build()
///     .expect("Failed to build configuration");
///
/// let authorizer = Authorizer::builder()
///     .config(config)
///     .store(Arc::new(MemoryCredentialStore::new()))
///     .build()
///     .expect("Failed to build authorizer");
/// ```
pub mod builder;

/// Claims expected in the signed bearer tokens.
pub mod claims;

/// [AuthorizerConfig](crate::config::AuthorizerConfig) holds the OAuth2
/// client, the token signing secret and the deployment environment.
pub mod config;

/// Store connection lifecycle: open once, reuse while healthy, reopen on failure.
pub mod connection;

pub mod error;

/// Gateway input.
pub mod event;

pub mod identity;

/// Client for the OAuth2 token endpoint that mints refreshed credentials.
pub mod issuer;

pub mod jwt_extract;

pub mod jwt_unverified;

/// Allow/deny decision documents returned to the gateway.
pub mod policy;

/// Expiry detection and replacement of stored credentials.
pub mod refresh;

mod service;

/// [CredentialStore](crate::store::CredentialStore) and its implementations.
pub mod store;

/// [ClaimsValidationSpec](crate::validation::ClaimsValidationSpec) is used to
/// optionally customize what claims are required in incoming tokens.
pub mod validation;

pub mod verifier;

/// Detection of keep-alive invocations.
pub mod warmup;
