use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::DataApiClient;

use crate::models::{Disease, MedicineError};

const DISEASES: &str = "diseases";

pub struct MedicineService {
    store: DataApiClient,
}

impl MedicineService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DataApiClient::new(config),
        }
    }

    /// Case-insensitive lookup of a disease by name.
    pub async fn find_by_disease(&self, name: &str) -> Result<Disease, MedicineError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(MedicineError::MissingDiseaseName);
        }

        // Anchored so "cold" does not also match "common cold".
        let pattern = format!("^{}$", regex_escape(trimmed));
        let document = self
            .store
            .find_one(
                DISEASES,
                json!({ "disease": { "$regex": pattern, "$options": "i" } }),
            )
            .await?
            .ok_or(MedicineError::DiseaseNotFound)?;

        debug!("Medicine lookup hit for '{}'", trimmed);
        serde_json::from_value(document)
            .map_err(|e| MedicineError::Database(format!("Failed to parse disease: {}", e)))
    }
}

/// Escape regex metacharacters so user input is matched literally.
fn regex_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
