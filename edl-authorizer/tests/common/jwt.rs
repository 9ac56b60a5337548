use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::common::SIGNING_SECRET;

#[derive(Clone, Debug)]
pub struct JwtBuilder {
    secret: String,
    id: Option<i64>,
    username: Option<String>,
    exp: Option<u64>,
}

impl JwtBuilder {
    pub fn new() -> Self {
        JwtBuilder::default()
    }

    pub fn secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn username<S: Into<String>>(mut self, username: S) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn exp(mut self, exp: u64) -> Self {
        self.exp = Some(exp);
        self
    }

    pub fn build(&self) -> String {
        let header = Header::new(Algorithm::HS256);

        let mut claims = json!({});

        if let Some(id) = self.id {
            claims["id"] = json!(id);
        }
        if let Some(ref username) = self.username {
            claims["username"] = json!(username);
        }
        if let Some(exp) = self.exp {
            claims["exp"] = json!(exp);
        }

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .unwrap()
    }
}

impl Default for JwtBuilder {
    fn default() -> Self {
        JwtBuilder {
            secret: SIGNING_SECRET.to_owned(),
            id: Some(42),
            username: Some("alice".to_owned()),
            exp: None,
        }
    }
}
