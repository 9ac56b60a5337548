use serde::{Deserialize, Serialize};

/// Token authorizer input as delivered by the API gateway.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_token: Option<String>,
    #[serde(default)]
    pub method_arn: String,
    /// Set by scheduled keep-alive invocations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl AuthorizerEvent {
    pub fn new(method_arn: impl Into<String>) -> Self {
        Self {
            method_arn: method_arn.into(),
            ..Default::default()
        }
    }

    pub fn authorization_token(mut self, authorization_token: impl Into<String>) -> Self {
        self.authorization_token = Some(authorization_token.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
