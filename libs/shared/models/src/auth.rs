use serde::{Deserialize, Serialize};

use crate::account::AccountType;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "accountType")]
    pub account_type: AccountType,
    pub exp: u64,
    pub iat: u64,
}

/// The authenticated caller, decoded from a validated bearer token and
/// inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub account_type: AccountType,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }
}
