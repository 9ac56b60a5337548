#![allow(dead_code)]

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use edl_authorizer::{
    authorizer::Authorizer,
    config::AuthorizerConfig,
    event::AuthorizerEvent,
    store::{memory::MemoryCredentialStore, CredentialStore, NewCredential, StoredCredential},
};
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::jwt::JwtBuilder;

pub mod jwt;

pub const SIGNING_SECRET: &str = "integration-signing-secret";
pub const ENVIRONMENT: &str = "sit";
pub const ARN: &str = "arn:aws:execute-api:us-east-1:123456789012:abcdef/prod/GET/collections";
pub const HOUR: Duration = Duration::from_secs(3600);

pub struct TestContext {
    pub mock_server: MockServer,
    pub store: MemoryCredentialStore,
    pub authorizer: Authorizer,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let store = MemoryCredentialStore::new();
        let config = AuthorizerConfig::builder()
            .client_id("client")
            .client_secret("secret")
            .token_host(mock_server.uri())
            .signing_secret(SIGNING_SECRET)
            .environment(ENVIRONMENT)
            .build()
            .expect("Failed to build configuration");
        let authorizer = Authorizer::builder()
            .config(config)
            .store(Arc::new(store.clone()))
            .build()
            .expect("Failed to build authorizer");
        Self {
            mock_server,
            store,
            authorizer,
        }
    }

    pub fn valid_jwt(&self) -> JwtBuilder {
        JwtBuilder::new()
    }

    pub async fn seed(&self, user_id: i64, access_token: &str, expires_at: SystemTime) -> StoredCredential {
        self.store
            .insert_credential(NewCredential {
                user_id,
                access_token: access_token.to_owned(),
                refresh_token: format!("{}-refresh", access_token),
                expires_at,
                environment: ENVIRONMENT.to_owned(),
            })
            .await
            .expect("Failed to seed credential")
    }

    pub async fn rows_for(&self, user_id: i64) -> Vec<StoredCredential> {
        self.store
            .fetch_credentials_for_user(user_id)
            .await
            .expect("Failed to read credentials")
    }

    pub async fn mock_refresh(&self, refresh_token: &str, access_token: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains(format!("refresh_token={}", refresh_token)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access_token,
                "refresh_token": format!("{}-refresh", access_token),
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(expected_calls)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_refresh_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .mount(&self.mock_server)
            .await;
    }

    pub async fn expect_no_refresh(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.mock_server)
            .await;
    }
}

pub fn bearer_event(token: &str) -> AuthorizerEvent {
    AuthorizerEvent::new(ARN).authorization_token(format!("Bearer {}", token))
}

pub fn unix_epoch_sec_from_now(sec: i64) -> u64 {
    (SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
        + sec) as u64
}
