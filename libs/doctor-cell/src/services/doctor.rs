use std::collections::HashMap;

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::DataApiClient;
use shared_models::account::UserAccount;
use shared_models::time::WEEKDAY_NAMES;

use crate::models::{Doctor, DoctorWithUser, SearchDoctorsQuery, UpdateProfileRequest};

const USERS: &str = "users";
const DOCTORS: &str = "doctors";
const PATIENTS: &str = "patients";

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found.")]
    NotFound,

    #[error("No doctors found.")]
    NoneFound,

    #[error("No users found matching your name criteria")]
    NoUserMatch,

    #[error("No doctors found matching your criteria")]
    NoSearchMatch,

    #[error("Doctor profile not found.")]
    ProfileNotFound,

    #[error("Patient profile not found.")]
    PatientProfileNotFound,

    #[error("User associated with this profile not found.")]
    UserNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unreachable: {0}")]
    Upstream(String),
}

impl From<shared_database::StoreError> for DoctorError {
    fn from(e: shared_database::StoreError) -> Self {
        match e {
            shared_database::StoreError::Transport(inner) => {
                DoctorError::Upstream(inner.to_string())
            }
            other => DoctorError::Database(other.to_string()),
        }
    }
}

pub struct DoctorService {
    store: DataApiClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DataApiClient::new(config),
        }
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        let document = self
            .store
            .find_one(DOCTORS, json!({ "_id": doctor_id }))
            .await?
            .ok_or(DoctorError::NotFound)?;

        serde_json::from_value(document)
            .map_err(|e| DoctorError::Database(format!("Failed to parse doctor: {}", e)))
    }

    /// All doctors with their user records attached.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorWithUser>, DoctorError> {
        let documents = self.store.find(DOCTORS, json!({}), None).await?;
        if documents.is_empty() {
            return Err(DoctorError::NoneFound);
        }

        let mut doctors = Vec::with_capacity(documents.len());
        for document in documents {
            let doctor: Doctor = serde_json::from_value(document)
                .map_err(|e| DoctorError::Database(format!("Failed to parse doctor: {}", e)))?;
            let user = self.populate_user(doctor.user).await?;
            doctors.push(DoctorWithUser { doctor, user });
        }

        Ok(doctors)
    }

    /// Case-insensitive search over user names and doctor specialization.
    pub async fn search_doctors(
        &self,
        query: SearchDoctorsQuery,
    ) -> Result<Vec<DoctorWithUser>, DoctorError> {
        debug!("Searching doctors: {:?}", query);

        let mut user_filter = Map::new();
        if let Some(first_name) = &query.first_name {
            user_filter.insert(
                "firstName".to_string(),
                json!({ "$regex": first_name, "$options": "i" }),
            );
        }
        if let Some(last_name) = &query.last_name {
            user_filter.insert(
                "lastName".to_string(),
                json!({ "$regex": last_name, "$options": "i" }),
            );
        }

        let users = self
            .store
            .find(USERS, Value::Object(user_filter), None)
            .await?;
        if users.is_empty() {
            return Err(DoctorError::NoUserMatch);
        }

        let mut users_by_id: HashMap<Uuid, UserAccount> = HashMap::new();
        for user in users {
            if let Ok(account) = serde_json::from_value::<UserAccount>(user) {
                users_by_id.insert(account.id, account);
            }
        }

        let ids: Vec<&Uuid> = users_by_id.keys().collect();
        let mut doctor_filter = json!({ "user": { "$in": ids } });
        if let Some(specialization) = &query.specialization {
            doctor_filter["specialization"] = json!({ "$regex": specialization, "$options": "i" });
        }

        let documents = self.store.find(DOCTORS, doctor_filter, None).await?;
        if documents.is_empty() {
            return Err(DoctorError::NoSearchMatch);
        }

        let mut doctors = Vec::with_capacity(documents.len());
        for document in documents {
            let doctor: Doctor = serde_json::from_value(document)
                .map_err(|e| DoctorError::Database(format!("Failed to parse doctor: {}", e)))?;
            let user = users_by_id
                .get(&doctor.user)
                .map(serde_json::to_value)
                .transpose()
                .map_err(|e| DoctorError::Database(e.to_string()))?;
            doctors.push(DoctorWithUser { doctor, user });
        }

        Ok(doctors)
    }

    /// Update the role profile and the common user fields, switched on the
    /// request's account type.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<(Value, Value), DoctorError> {
        use shared_models::account::AccountType;

        let profile = match request.account_type {
            AccountType::Doctor => {
                let doctor_set = Self::doctor_update_fields(&request)?;
                if !doctor_set.is_empty() {
                    let matched = self
                        .store
                        .update_one(
                            DOCTORS,
                            json!({ "user": user_id }),
                            json!({ "$set": Value::Object(doctor_set) }),
                        )
                        .await?;
                    if matched == 0 {
                        return Err(DoctorError::ProfileNotFound);
                    }
                }
                self.store
                    .find_one(DOCTORS, json!({ "user": user_id }))
                    .await?
                    .ok_or(DoctorError::ProfileNotFound)?
            }
            _ => self
                .store
                .find_one(PATIENTS, json!({ "user": user_id }))
                .await?
                .ok_or(DoctorError::PatientProfileNotFound)?,
        };

        let user_set = Self::user_update_fields(&request);
        if !user_set.is_empty() {
            let matched = self
                .store
                .update_one(
                    USERS,
                    json!({ "_id": user_id }),
                    json!({ "$set": Value::Object(user_set) }),
                )
                .await?;
            if matched == 0 {
                return Err(DoctorError::UserNotFound);
            }
        }

        let user_document = self
            .store
            .find_one(USERS, json!({ "_id": user_id }))
            .await?
            .ok_or(DoctorError::UserNotFound)?;
        let user: UserAccount = serde_json::from_value(user_document)
            .map_err(|e| DoctorError::Database(format!("Failed to parse user: {}", e)))?;
        let user = serde_json::to_value(&user).map_err(|e| DoctorError::Database(e.to_string()))?;

        Ok((profile, user))
    }

    /// Remove a doctor profile and its user account.
    pub async fn delete_doctor(&self, user_id: Uuid) -> Result<(), DoctorError> {
        let deleted_profiles = self
            .store
            .delete_one(DOCTORS, json!({ "user": user_id }))
            .await?;
        let deleted_users = self
            .store
            .delete_one(USERS, json!({ "_id": user_id }))
            .await?;

        if deleted_profiles == 0 || deleted_users == 0 {
            return Err(DoctorError::NotFound);
        }

        Ok(())
    }

    fn doctor_update_fields(request: &UpdateProfileRequest) -> Result<Map<String, Value>, DoctorError> {
        let mut fields = Map::new();

        if let Some(specialization) = &request.specialization {
            fields.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(fee) = request.consultant_fee {
            fields.insert("consultantFee".to_string(), json!(fee));
        }
        if let Some(experience) = request.experience {
            fields.insert("experience".to_string(), json!(experience));
        }
        if let Some(degrees) = &request.degrees {
            fields.insert("degrees".to_string(), json!(degrees));
        }
        if let Some(certification) = &request.certification {
            fields.insert("certification".to_string(), json!(certification));
        }
        if let Some(days) = &request.available_days {
            for day in days {
                if !WEEKDAY_NAMES.contains(&day.as_str()) {
                    return Err(DoctorError::Validation(format!(
                        "Unknown weekday name: {}",
                        day
                    )));
                }
            }
            fields.insert("availableDays".to_string(), json!(days));
        }
        if let Some(window) = &request.available_time_slot {
            if window.start >= window.end {
                return Err(DoctorError::Validation(
                    "Start time must be before end time".to_string(),
                ));
            }
            fields.insert("availableTimeSlot".to_string(), json!(window));
        }

        Ok(fields)
    }

    fn user_update_fields(request: &UpdateProfileRequest) -> Map<String, Value> {
        let mut fields = Map::new();

        if let Some(first_name) = &request.first_name {
            fields.insert("firstName".to_string(), json!(first_name));
        }
        if let Some(last_name) = &request.last_name {
            fields.insert("lastName".to_string(), json!(last_name));
        }
        if let Some(contact_number) = &request.contact_number {
            fields.insert("contactNumber".to_string(), json!(contact_number));
        }
        if let Some(gender) = &request.gender {
            fields.insert("gender".to_string(), json!(gender));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            fields.insert("dateOfBirth".to_string(), json!(date_of_birth));
        }
        if let Some(blood_group) = &request.blood_group {
            fields.insert("bloodGroup".to_string(), json!(blood_group));
        }
        if let Some(image) = &request.image {
            fields.insert("image".to_string(), json!(image));
        }

        fields
    }

    async fn populate_user(&self, user_id: Uuid) -> Result<Option<Value>, DoctorError> {
        let Some(document) = self
            .store
            .find_one(USERS, json!({ "_id": user_id }))
            .await?
        else {
            return Ok(None);
        };

        // Round-trip through the typed account so the password hash is
        // stripped before the document leaves the API.
        let user: UserAccount = serde_json::from_value(document)
            .map_err(|e| DoctorError::Database(format!("Failed to parse user: {}", e)))?;
        let value = serde_json::to_value(&user).map_err(|e| DoctorError::Database(e.to_string()))?;
        Ok(Some(value))
    }
}
