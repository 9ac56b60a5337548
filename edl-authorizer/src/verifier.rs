use std::fmt;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

#[cfg(test)]
use mockall::automock;

use crate::{
    claims::IdentityClaims, error::AuthError, identity::VerifiedIdentity,
    jwt_unverified::UnverifiedJwt, validation::ClaimsValidationSpec,
};

#[cfg_attr(test, automock)]
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, jwt: &UnverifiedJwt) -> Result<VerifiedIdentity, AuthError>;
}

/// Verifies HMAC signed tokens against a single shared secret.
pub struct SharedSecretVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

impl SharedSecretVerifier {
    pub fn new(secret: &[u8], claims_validation: &ClaimsValidationSpec) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: claims_validation.to_validation(&HMAC_ALGORITHMS),
        }
    }
}

impl SignatureVerifier for SharedSecretVerifier {
    fn verify(&self, jwt: &UnverifiedJwt) -> Result<VerifiedIdentity, AuthError> {
        if jwt.as_str().is_empty() {
            return Err(AuthError::InvalidSignature {
                reason: ErrorKind::InvalidToken,
            });
        }
        match decode::<IdentityClaims>(jwt.as_str(), &self.decoding_key, &self.validation) {
            Ok(data) => Ok(VerifiedIdentity::new(
                data.claims.id,
                data.claims.username,
                jwt.as_str(),
            )),
            Err(e) => Err(AuthError::InvalidSignature {
                reason: e.into_kind(),
            }),
        }
    }
}

impl fmt::Debug for SharedSecretVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecretVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &[u8] = b"a-shared-signing-secret";

    fn jwt_from(claims: &Value, alg: Algorithm, secret: &[u8]) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn unix_epoch_sec_from_now(sec: i64) -> u64 {
        (SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
            + sec) as u64
    }

    fn verifier(spec: ClaimsValidationSpec) -> SharedSecretVerifier {
        SharedSecretVerifier::new(SECRET, &spec)
    }

    #[test]
    fn valid_token() {
        let token = jwt_from(
            &json!({ "id": 42, "username": "alice" }),
            Algorithm::HS256,
            SECRET,
        );
        let identity = verifier(ClaimsValidationSpec::new())
            .verify(&UnverifiedJwt::new(token.clone()))
            .unwrap();

        assert_eq!(identity.user_id(), 42);
        assert_eq!(identity.username(), "alice");
        assert_eq!(identity.token(), token);
    }

    #[test]
    fn hs512_token() {
        let token = jwt_from(
            &json!({ "id": "7", "username": "bob" }),
            Algorithm::HS512,
            SECRET,
        );
        let identity = verifier(ClaimsValidationSpec::new())
            .verify(&UnverifiedJwt::new(token))
            .unwrap();

        assert_eq!(identity.user_id(), 7);
    }

    #[test]
    fn empty_token() {
        let result = verifier(ClaimsValidationSpec::new()).verify(&UnverifiedJwt::new(""));
        assert_eq!(
            result.unwrap_err(),
            AuthError::InvalidSignature {
                reason: ErrorKind::InvalidToken
            }
        );
    }

    #[test]
    fn malformed_token() {
        let result =
            verifier(ClaimsValidationSpec::new()).verify(&UnverifiedJwt::new("abc.def.ghi"));
        assert!(matches!(
            result.unwrap_err(),
            AuthError::InvalidSignature { .. }
        ));
    }

    #[test]
    fn wrong_secret() {
        let token = jwt_from(
            &json!({ "id": 42, "username": "alice" }),
            Algorithm::HS256,
            b"another-secret",
        );
        let result = verifier(ClaimsValidationSpec::new()).verify(&UnverifiedJwt::new(token));

        assert_eq!(
            result.unwrap_err(),
            AuthError::InvalidSignature {
                reason: ErrorKind::InvalidSignature
            }
        );
    }

    #[test]
    fn expired_token() {
        let token = jwt_from(
            &json!({ "id": 42, "username": "alice", "exp": unix_epoch_sec_from_now(-(60 * 2)) }),
            Algorithm::HS256,
            SECRET,
        );
        let result = verifier(ClaimsValidationSpec::new()).verify(&UnverifiedJwt::new(token));

        assert_eq!(
            result.unwrap_err(),
            AuthError::InvalidSignature {
                reason: ErrorKind::ExpiredSignature
            }
        );
    }

    #[test]
    fn missing_required_exp() {
        let token = jwt_from(
            &json!({ "id": 42, "username": "alice" }),
            Algorithm::HS256,
            SECRET,
        );
        let result =
            verifier(ClaimsValidationSpec::new().exp(true)).verify(&UnverifiedJwt::new(token));

        assert_eq!(
            result.unwrap_err(),
            AuthError::InvalidSignature {
                reason: ErrorKind::MissingRequiredClaim("exp".to_owned())
            }
        );
    }

    #[test]
    fn invalid_iss() {
        let token = jwt_from(
            &json!({ "id": 42, "username": "alice", "iss": "https://another-issuer.com" }),
            Algorithm::HS256,
            SECRET,
        );
        let result = verifier(ClaimsValidationSpec::new().iss("https://search.earthdata.nasa.gov"))
            .verify(&UnverifiedJwt::new(token));

        assert_eq!(
            result.unwrap_err(),
            AuthError::InvalidSignature {
                reason: ErrorKind::InvalidIssuer
            }
        );
    }

    #[test]
    fn missing_identity_claims() {
        let token = jwt_from(&json!({ "sub": "alice" }), Algorithm::HS256, SECRET);
        let result = verifier(ClaimsValidationSpec::new()).verify(&UnverifiedJwt::new(token));

        assert!(matches!(
            result.unwrap_err(),
            AuthError::InvalidSignature { .. }
        ));
    }

    #[test]
    fn rejects_unsigned_algorithms() {
        let token = jwt_from(
            &json!({ "id": 42, "username": "alice" }),
            Algorithm::HS256,
            SECRET,
        );
        let mut parts = token.split('.');
        // {"alg":"none","typ":"JWT"}
        let forged = format!(
            "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.",
            parts.nth(1).unwrap()
        );
        let result = verifier(ClaimsValidationSpec::new()).verify(&UnverifiedJwt::new(forged));

        assert!(result.is_err());
    }
}
