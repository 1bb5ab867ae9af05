use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account roles carried on the wire as capitalized names ("Doctor",
/// "Patient", "Admin"), matching the stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Doctor,
    Patient,
    Admin,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Doctor => write!(f, "Doctor"),
            AccountType::Patient => write!(f, "Patient"),
            AccountType::Admin => write!(f, "Admin"),
        }
    }
}

/// A user document from the `users` collection. The password hash is read
/// in for credential checks but never serialized back out of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    pub account_type: AccountType,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub blood_group: Option<String>,
    pub created_at: DateTime<Utc>,
}
