use std::fmt::Display;

use jsonwebtoken::{Algorithm, Validation};

/// Which registered claims a bearer token must carry and satisfy.
///
/// `exp` and `nbf` are always checked when a token carries them; setting
/// them here additionally makes them mandatory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimsValidationSpec {
    pub iss: Option<String>,
    pub exp: bool,
    pub nbf: bool,
    pub aud: Option<Vec<String>>,
    pub leeway: u64,
}

impl ClaimsValidationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iss(mut self, issuer: &str) -> Self {
        self.iss = Some(issuer.to_owned());
        self
    }

    pub fn exp(mut self, require: bool) -> Self {
        self.exp = require;
        self
    }

    pub fn nbf(mut self, require: bool) -> Self {
        self.nbf = require;
        self
    }

    pub fn aud(mut self, audiences: Vec<String>) -> Self {
        self.aud = Some(audiences);
        self
    }

    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub(crate) fn to_validation(&self, algorithms: &[Algorithm]) -> Validation {
        let mut validation = Validation::new(algorithms[0]);
        validation.algorithms = algorithms.to_vec();
        validation.leeway = self.leeway;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let mut required_claims = Vec::<&'static str>::new();
        if let Some(iss) = &self.iss {
            required_claims.push("iss");
            validation.set_issuer(&[iss]);
        }
        if self.exp {
            required_claims.push("exp");
        }
        if self.nbf {
            required_claims.push("nbf");
        }
        if let Some(aud) = &self.aud {
            required_claims.push("aud");
            validation.set_audience(aud);
        } else {
            validation.validate_aud = false;
        }
        validation.set_required_spec_claims(&required_claims);
        validation
    }
}

impl Display for ClaimsValidationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_nothing() {
        let validation = ClaimsValidationSpec::new().to_validation(&[Algorithm::HS256]);
        assert!(validation.required_spec_claims.is_empty());
        assert!(validation.validate_exp);
        assert!(!validation.validate_aud);
    }

    #[test]
    fn required_claims() {
        let validation = ClaimsValidationSpec::new()
            .exp(true)
            .iss("https://urs.earthdata.nasa.gov")
            .aud(vec!["edsc".to_owned()])
            .to_validation(&[Algorithm::HS256, Algorithm::HS512]);
        assert!(validation.required_spec_claims.contains("exp"));
        assert!(validation.required_spec_claims.contains("iss"));
        assert!(validation.required_spec_claims.contains("aud"));
        assert!(!validation.required_spec_claims.contains("nbf"));
        assert_eq!(
            validation.algorithms,
            vec![Algorithm::HS256, Algorithm::HS512]
        );
    }
}
