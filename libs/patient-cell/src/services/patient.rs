use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::DataApiClient;

use crate::models::PatientError;
use crate::services::local_profile::LocalProfileStore;

const USERS: &str = "users";
const PATIENTS: &str = "patients";

pub struct PatientService {
    store: DataApiClient,
    extras: LocalProfileStore,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DataApiClient::new(config),
            extras: LocalProfileStore::new(&config.profile_extras_path),
        }
    }

    pub fn extras(&self) -> &LocalProfileStore {
        &self.extras
    }

    /// Remove the patient profile, the user account and any local
    /// profile extras.
    pub async fn delete_patient(&self, user_id: Uuid) -> Result<(), PatientError> {
        let profiles = self
            .store
            .delete_one(PATIENTS, json!({ "user": user_id }))
            .await?;
        if profiles == 0 {
            return Err(PatientError::NotFound);
        }

        let users = self
            .store
            .delete_one(USERS, json!({ "_id": user_id }))
            .await?;
        if users == 0 {
            return Err(PatientError::UserNotFound);
        }

        // Sidecar cleanup is best-effort; the account is already gone.
        if let Err(e) = self.extras.remove(user_id) {
            warn!("Failed to remove profile extras for {}: {}", user_id, e);
        }

        debug!("Deleted patient account {}", user_id);
        Ok(())
    }
}
