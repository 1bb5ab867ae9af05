//! Shared fixtures for cell tests: config wiring, token minting and canned
//! Data API documents/responses for wiremock-backed stores.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::account::{AccountType, UserAccount};
use shared_models::auth::AuthUser;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub data_api_url: String,
    pub data_api_key: String,
    pub profile_extras_path: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            data_api_url: "http://localhost:59999".to_string(),
            data_api_key: "test-api-key".to_string(),
            profile_extras_path: "profile_extras_test.json".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the store client at a wiremock server.
    pub fn with_store_url(url: &str) -> Self {
        Self {
            data_api_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            data_api_url: self.data_api_url.clone(),
            data_api_key: self.data_api_key.clone(),
            data_source: "Cluster0".to_string(),
            database: "carelink_test".to_string(),
            jwt_secret: self.jwt_secret.clone(),
            port: 0,
            profile_extras_path: self.profile_extras_path.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub account_type: AccountType,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            account_type: AccountType::Patient,
        }
    }
}

impl TestUser {
    pub fn new(email: &str, account_type: AccountType) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            account_type,
        }
    }

    pub fn auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.to_string(),
            email: self.email.clone(),
            account_type: self.account_type,
        }
    }

    pub fn account(&self) -> UserAccount {
        UserAccount {
            id: self.id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: self.email.clone(),
            contact_number: None,
            password_hash: None,
            account_type: self.account_type,
            image: None,
            gender: None,
            date_of_birth: None,
            blood_group: None,
            created_at: Utc::now(),
        }
    }

    pub fn token(&self, jwt_secret: &str) -> String {
        issue_token(&self.account(), jwt_secret).expect("token minting failed")
    }
}

/// Canned Data API response bodies and store documents.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn found_one(document: Value) -> Value {
        json!({ "document": document })
    }

    pub fn found_none() -> Value {
        json!({ "document": null })
    }

    pub fn found(documents: Vec<Value>) -> Value {
        json!({ "documents": documents })
    }

    pub fn inserted(id: &str) -> Value {
        json!({ "insertedId": id })
    }

    pub fn updated(matched: u64) -> Value {
        json!({ "matchedCount": matched, "modifiedCount": matched })
    }

    pub fn deleted(count: u64) -> Value {
        json!({ "deletedCount": count })
    }

    pub fn user_doc(id: &Uuid, first_name: &str, email: &str, account_type: &str) -> Value {
        json!({
            "_id": id,
            "firstName": first_name,
            "lastName": "Example",
            "email": email,
            "contactNumber": "5550100",
            "accountType": account_type,
            "createdAt": Utc::now().to_rfc3339(),
        })
    }

    /// A doctor with the stock Monday-Friday 09:00-17:00 schedule.
    pub fn doctor_doc(id: &Uuid, user_id: &Uuid) -> Value {
        json!({
            "_id": id,
            "user": user_id,
            "specialization": "General Medicine",
            "consultantFee": 500.0,
            "experience": 8,
            "degrees": ["MBBS"],
            "availableDays": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
            "availableTimeSlot": { "start": "09:00", "end": "17:00" },
            "createdAt": Utc::now().to_rfc3339(),
        })
    }

    pub fn appointment_doc(
        id: &Uuid,
        patient_id: &Uuid,
        doctor_id: &Uuid,
        date: &str,
        start: &str,
        end: &str,
    ) -> Value {
        json!({
            "_id": id,
            "patient": patient_id,
            "doctor": doctor_id,
            "date": date,
            "timeSlot": { "start": start, "end": end },
            "description": "Follow-up",
            "paymentStatus": false,
            "createdAt": Utc::now().to_rfc3339(),
        })
    }

    pub fn disease_doc(name: &str, allopathic: Vec<&str>, ayurvedic: Vec<&str>) -> Value {
        json!({
            "_id": Uuid::new_v4(),
            "disease": name,
            "Allopathic": allopathic,
            "Ayurvedic": ayurvedic,
        })
    }
}
