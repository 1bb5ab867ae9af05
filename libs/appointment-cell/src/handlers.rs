use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use doctor_cell::services::doctor::DoctorService;

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::BookingService;

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::MissingFields
            | AppointmentError::InvalidDate
            | AppointmentError::InvalidTime(_)
            | AppointmentError::InvalidId(_)
            | AppointmentError::StartNotBeforeEnd
            | AppointmentError::DayUnavailable(_)
            | AppointmentError::OutsideWindow { .. }
            | AppointmentError::InvalidDuration => AppError::ValidationError(e.to_string()),
            AppointmentError::DoctorNotFound | AppointmentError::NotFound => {
                AppError::NotFound(e.to_string())
            }
            AppointmentError::Conflict | AppointmentError::LockUnavailable => {
                AppError::Conflict(e.to_string())
            }
            AppointmentError::Database(msg) => AppError::Database(msg),
            AppointmentError::Upstream(msg) => AppError::ExternalService(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if let Some(user) = &request.user {
        if caller.id != *user && !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Not authorized to book for this patient".to_string(),
            ));
        }
    }

    let service = BookingService::new(&state);
    let confirmation = service.book_appointment(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment booked successfully.",
            "appointment": confirmation,
        })),
    ))
}

/// Booked slots for a doctor, grouped by date. Public so the booking UI
/// can grey out taken slots without a session.
#[axum::debug_handler]
pub async fn available_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let booked = service.booked_time_slots(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "bookedTimeSlots": booked,
    })))
}

#[axum::debug_handler]
pub async fn patients_bookings(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if caller.id != patient_id.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these bookings".to_string(),
        ));
    }

    let service = BookingService::new(&state);
    let appointments = service.appointments_for_patient(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
    })))
}

#[axum::debug_handler]
pub async fn doctors_bookings(
    State(state): State<Arc<AppConfig>>,
    Extension(caller): Extension<AuthUser>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&state);
    let doctor = doctors.get_doctor(doctor_id).await?;
    if caller.id != doctor.user.to_string() && !caller.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these bookings".to_string(),
        ));
    }

    let service = BookingService::new(&state);
    let appointments = service.appointments_for_doctor(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments,
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(_caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    service.delete_appointment(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully.",
    })))
}
