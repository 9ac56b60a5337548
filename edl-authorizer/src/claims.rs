use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Claims carried by the signed tokens this authorizer accepts.
///
/// `id` is the internal user id and may be encoded as a number or a
/// numeric string.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct IdentityClaims {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub id: i64,
    pub username: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
}
