use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::time::TimeSlot;

/// Booking duration bounds, in minutes.
pub const MIN_SLOT_MINUTES: i64 = 15;
pub const MAX_SLOT_MINUTES: i64 = 45;

/// An appointment document from the `appointments` collection. Never
/// mutated in place: cancellation deletes it and rebooking creates a new
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub patient: Uuid,
    pub doctor: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_status: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw booking request as it arrives on the wire. Fields stay strings so
/// malformed input surfaces as a structured validation error instead of a
/// bare deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub user: Option<String>,
    pub doctor: Option<String>,
    pub date: Option<String>,
    pub time_slot: Option<RawTimeSlot>,
    pub description: Option<String>,
    pub payment_status: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeSlot {
    pub start: String,
    pub end: String,
}

/// The created appointment with its related records attached.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Option<Value>,
    pub doctor: Value,
}

/// Booked slots for one calendar day.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedDay {
    pub time_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Missing required fields: user, doctor, date, and timeSlot are required")]
    MissingFields,

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("The time slot start must be before its end.")]
    StartNotBeforeEnd,

    #[error("Doctor not found.")]
    DoctorNotFound,

    #[error("The doctor is not available on {0}.")]
    DayUnavailable(String),

    #[error("The selected time slot is outside the doctor's available time range of {start} to {end}.")]
    OutsideWindow { start: String, end: String },

    #[error("The time slot must be at least 15 minutes and at most 45 minutes long.")]
    InvalidDuration,

    #[error("This time slot is already booked for the selected doctor.")]
    Conflict,

    #[error("The booking slot is busy. Please try again.")]
    LockUnavailable,

    #[error("Appointment not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unreachable: {0}")]
    Upstream(String),
}

impl From<shared_database::StoreError> for AppointmentError {
    fn from(e: shared_database::StoreError) -> Self {
        match e {
            shared_database::StoreError::Transport(inner) => {
                AppointmentError::Upstream(inner.to_string())
            }
            other => AppointmentError::Database(other.to_string()),
        }
    }
}
