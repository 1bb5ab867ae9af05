use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{PatientError, ProfileExtras};
use crate::services::PatientService;

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::NotFound | PatientError::UserNotFound => {
                AppError::NotFound(e.to_string())
            }
            PatientError::Sidecar(msg) => AppError::Internal(msg),
            PatientError::Database(msg) => AppError::Database(msg),
            PatientError::Upstream(msg) => AppError::ExternalService(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if caller.id != user_id.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to delete this account".to_string(),
        ));
    }

    let service = PatientService::new(&state);
    service.delete_patient(user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient deleted successfully",
    })))
}

#[axum::debug_handler]
pub async fn get_profile_extras(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if caller.id != user_id.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view this profile".to_string(),
        ));
    }

    let service = PatientService::new(&state);
    let extras = service.extras().get(user_id)?.unwrap_or_default();

    Ok(Json(json!({
        "success": true,
        "profileExtras": extras,
    })))
}

#[axum::debug_handler]
pub async fn put_profile_extras(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(extras): Json<ProfileExtras>,
) -> Result<Json<Value>, AppError> {
    if caller.id != user_id.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to update this profile".to_string(),
        ));
    }

    let service = PatientService::new(&state);
    service.extras().put(user_id, extras)?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile details saved successfully.",
    })))
}
