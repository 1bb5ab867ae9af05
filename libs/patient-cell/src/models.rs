use serde::{Deserialize, Serialize};

/// Free-form profile details kept in the local sidecar file rather than
/// the remote profile store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileExtras {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found.")]
    NotFound,

    #[error("User not found.")]
    UserNotFound,

    #[error("Profile extras store is unavailable: {0}")]
    Sidecar(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unreachable: {0}")]
    Upstream(String),
}

impl From<shared_database::StoreError> for PatientError {
    fn from(e: shared_database::StoreError) -> Self {
        match e {
            shared_database::StoreError::Transport(inner) => {
                PatientError::Upstream(inner.to_string())
            }
            other => PatientError::Database(other.to_string()),
        }
    }
}

impl From<std::io::Error> for PatientError {
    fn from(e: std::io::Error) -> Self {
        PatientError::Sidecar(e.to_string())
    }
}
