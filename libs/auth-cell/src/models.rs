use serde::{Deserialize, Serialize};

use shared_models::account::{AccountType, UserAccount};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub password: String,
    pub account_type: AccountType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account returned by login, password hash stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub account_type: AccountType,
    pub image: Option<String>,
    pub contact_number: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
}

impl From<&UserAccount> for LoginUser {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            account_type: user.account_type,
            image: user.image.clone(),
            contact_number: user.contact_number.clone(),
            date_of_birth: user.date_of_birth,
            gender: user.gender.clone(),
            blood_group: user.blood_group.clone(),
        }
    }
}
