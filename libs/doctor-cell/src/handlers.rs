use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{SearchDoctorsQuery, UpdateProfileRequest};
use crate::services::doctor::{DoctorError, DoctorService};
use crate::services::projector::project_week;

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound
            | DoctorError::NoneFound
            | DoctorError::NoUserMatch
            | DoctorError::NoSearchMatch
            | DoctorError::ProfileNotFound
            | DoctorError::PatientProfileNotFound
            | DoctorError::UserNotFound => AppError::NotFound(e.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::Database(msg) => AppError::Database(msg),
            DoctorError::Upstream(msg) => AppError::ExternalService(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn get_all_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctors = service.list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctors retrieved successfully.",
        "doctors": doctors,
    })))
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SearchDoctorsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctors = service.search_doctors(query).await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors,
    })))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    if caller.id != user_id.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to update this profile".to_string(),
        ));
    }

    let service = DoctorService::new(&state);
    let account_type = request.account_type;
    let (profile, user) = service.update_profile(user_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} profile updated successfully.", account_type),
        "profile": profile,
        "user": user,
    })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if caller.id != user_id.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to delete this account".to_string(),
        ));
    }

    let service = DoctorService::new(&state);
    service.delete_doctor(user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor deleted successfully",
    })))
}

/// Advisory 7-day availability projection for the booking UI. Derived
/// entirely from the doctor's declared schedule; real conflicts are
/// rejected at booking time.
#[axum::debug_handler]
pub async fn doctor_availability(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);
    let doctor = service.get_doctor(doctor_id).await?;

    let today = Utc::now().date_naive();
    let availability = project_week(
        today,
        &doctor.available_days,
        &doctor.available_time_slot,
    );

    Ok(Json(json!({
        "success": true,
        "doctorId": doctor_id,
        "availability": availability,
    })))
}
