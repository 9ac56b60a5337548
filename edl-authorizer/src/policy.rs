use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

impl Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionContext {
    pub jwt_token: String,
}

/// Authorizer response handed back to the API gateway.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub principal_id: String,
    pub context: DecisionContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_document: Option<PolicyDocument>,
}

impl Decision {
    pub fn effect(&self) -> Option<Effect> {
        self.policy_document
            .as_ref()
            .and_then(|document| document.statement.first())
            .map(|statement| statement.effect)
    }

    pub fn resource(&self) -> Option<&str> {
        self.policy_document
            .as_ref()
            .and_then(|document| document.statement.first())
            .map(|statement| statement.resource.as_str())
    }
}

/// Builds a decision for `username`, attaching `token` as context.
///
/// A policy document is only embedded when both `effect` and `resource`
/// are given.
pub fn generate_policy(
    username: &str,
    token: &str,
    effect: Option<Effect>,
    resource: Option<&str>,
) -> Decision {
    let policy_document = match (effect, resource) {
        (Some(effect), Some(resource)) => Some(PolicyDocument {
            version: POLICY_VERSION.to_owned(),
            statement: vec![Statement {
                action: INVOKE_ACTION.to_owned(),
                effect,
                resource: resource.to_owned(),
            }],
        }),
        _ => None,
    };

    Decision {
        principal_id: username.to_owned(),
        context: DecisionContext {
            jwt_token: token.to_owned(),
        },
        policy_document,
    }
}
