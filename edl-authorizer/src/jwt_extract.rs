use crate::{error::AuthError, event::AuthorizerEvent, jwt_unverified::UnverifiedJwt};

pub trait JwtExtractor {
    fn extract_jwt(&self, event: &AuthorizerEvent) -> Result<UnverifiedJwt, AuthError>;
}

/// Takes the second space separated segment of `authorizationToken`.
///
/// The scheme segment is not inspected, so both `Bearer <jwt>` and
/// `Bearer: <jwt>` are accepted.
pub struct BearerTokenJwtExtractor;

impl JwtExtractor for BearerTokenJwtExtractor {
    fn extract_jwt(&self, event: &AuthorizerEvent) -> Result<UnverifiedJwt, AuthError> {
        let header = event
            .authorization_token
            .as_deref()
            .filter(|header| !header.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let token = header
            .split(' ')
            .nth(1)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidAuthorizationHeader)?;
        Ok(UnverifiedJwt::new(token))
    }
}
