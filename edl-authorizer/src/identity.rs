/// Caller identity established by a successfully verified bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifiedIdentity {
    user_id: i64,
    username: String,
    token: String,
}

impl VerifiedIdentity {
    pub fn new(user_id: i64, username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The signed token exactly as presented by the caller.
    pub fn token(&self) -> &str {
        &self.token
    }
}
