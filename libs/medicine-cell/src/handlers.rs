use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{MedicineError, MedicineQuery};
use crate::services::MedicineService;

impl From<MedicineError> for AppError {
    fn from(e: MedicineError) -> Self {
        match e {
            MedicineError::MissingDiseaseName => AppError::ValidationError(e.to_string()),
            MedicineError::DiseaseNotFound => AppError::NotFound(e.to_string()),
            MedicineError::Database(msg) => AppError::Database(msg),
            MedicineError::Upstream(msg) => AppError::ExternalService(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn get_medicines(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<MedicineQuery>,
) -> Result<Json<Value>, AppError> {
    let name = query
        .disease_name
        .ok_or(MedicineError::MissingDiseaseName)?;

    let service = MedicineService::new(&state);
    let disease = service.find_by_disease(&name).await?;

    Ok(Json(json!({
        "success": true,
        "medicines": disease,
    })))
}
