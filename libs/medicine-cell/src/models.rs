use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A disease document with its suggested medicines. The medicine system
/// keys are capitalized in the stored data, so they are preserved as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub disease: String,
    #[serde(rename = "Allopathic", default)]
    pub allopathic: Vec<String>,
    #[serde(rename = "Ayurvedic", default)]
    pub ayurvedic: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineQuery {
    pub disease_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MedicineError {
    #[error("Please provide a disease name.")]
    MissingDiseaseName,

    #[error("No medicines found for the given disease.")]
    DiseaseNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unreachable: {0}")]
    Upstream(String),
}

impl From<shared_database::StoreError> for MedicineError {
    fn from(e: shared_database::StoreError) -> Self {
        match e {
            shared_database::StoreError::Transport(inner) => {
                MedicineError::Upstream(inner.to_string())
            }
            other => MedicineError::Database(other.to_string()),
        }
    }
}
