use std::{error::Error, fmt::Display};

use http::{header::WWW_AUTHENTICATE, HeaderValue, Response, StatusCode};

#[derive(Clone, Debug, PartialEq)]
pub enum StartupError {
    InvalidParameter(String),
    MissingParameter(String),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for StartupError {}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreError {
    Unavailable(String),
    Query(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for StoreError {}

#[derive(Clone, Debug, PartialEq)]
pub enum IssuerError {
    Unreachable(String),
    Rejected { status: u16, body: String },
    InvalidResponse(String),
}

impl Display for IssuerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for IssuerError {}

/// Every way a single authorization can fail.
///
/// Only ever logged. Callers outside the crate see [Unauthorized].
#[derive(Clone, Debug, PartialEq)]
pub enum AuthError {
    MissingToken,
    InvalidAuthorizationHeader,
    InvalidSignature {
        reason: jsonwebtoken::errors::ErrorKind,
    },
    NoCredentials,
    RefreshFailed(String),
    StoreUnavailable(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) | StoreError::Query(reason) => {
                AuthError::StoreUnavailable(reason)
            }
        }
    }
}

impl From<IssuerError> for AuthError {
    fn from(e: IssuerError) -> Self {
        AuthError::RefreshFailed(e.to_string())
    }
}

/// The only failure an authorizer reports to its caller.
///
/// Which stage failed is deliberately not carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unauthorized;

impl Display for Unauthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unauthorized")
    }
}
impl Error for Unauthorized {}

impl From<AuthError> for Unauthorized {
    fn from(_: AuthError) -> Self {
        Unauthorized
    }
}

impl<B> From<Unauthorized> for Response<B>
where
    B: Default,
{
    fn from(_: Unauthorized) -> Self {
        let mut response = Response::new(B::default());
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}
