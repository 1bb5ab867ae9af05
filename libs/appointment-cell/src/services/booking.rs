use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::DataApiClient;
use shared_models::account::UserAccount;
use shared_models::time::{weekday_name, TimeSlot};

use doctor_cell::models::Doctor;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, BookedDay, BookingConfirmation,
    MAX_SLOT_MINUTES, MIN_SLOT_MINUTES,
};
use crate::services::lock::BookingLockService;

const USERS: &str = "users";
const DOCTORS: &str = "doctors";
const APPOINTMENTS: &str = "appointments";

/// Lock acquisition retries before giving up with a conflict.
const MAX_LOCK_ATTEMPTS: u32 = 3;

struct ValidatedBooking {
    patient_id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
    slot: TimeSlot,
    description: Option<String>,
    payment_status: bool,
}

pub struct BookingService {
    store: DataApiClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: DataApiClient::new(config),
        }
    }

    /// Validate a booking request against the doctor's declared schedule
    /// and existing bookings, then persist it.
    ///
    /// The overlap check and the insert run under a per-(doctor, date)
    /// booking lock so two racing requests cannot both pass the check.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookingConfirmation, AppointmentError> {
        let booking = Self::parse_request(request)?;

        let doctor = self.fetch_doctor(booking.doctor_id).await?;

        let day = weekday_name(booking.date.weekday());
        if !doctor.is_available_on(day) {
            return Err(AppointmentError::DayUnavailable(day.to_string()));
        }

        let window = &doctor.available_time_slot;
        if !window.contains(&booking.slot) {
            return Err(AppointmentError::OutsideWindow {
                start: window.start.format("%H:%M").to_string(),
                end: window.end.format("%H:%M").to_string(),
            });
        }

        let minutes = booking.slot.duration_minutes();
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&minutes) {
            return Err(AppointmentError::InvalidDuration);
        }

        let locks = BookingLockService::new(&self.store);
        for attempt in 1..=MAX_LOCK_ATTEMPTS {
            if locks.acquire(booking.doctor_id, booking.date).await? {
                let result = self.book_under_lock(&booking).await;
                locks.release(booking.doctor_id, booking.date).await;
                return result;
            }
            debug!(
                "Booking lock busy for doctor {} on {} (attempt {}/{})",
                booking.doctor_id, booking.date, attempt, MAX_LOCK_ATTEMPTS
            );
            tokio::time::sleep(tokio::time::Duration::from_millis(100 * attempt as u64)).await;
        }

        warn!(
            "Gave up on booking lock for doctor {} on {}",
            booking.doctor_id, booking.date
        );
        Err(AppointmentError::LockUnavailable)
    }

    async fn book_under_lock(
        &self,
        booking: &ValidatedBooking,
    ) -> Result<BookingConfirmation, AppointmentError> {
        let existing = self
            .store
            .find(
                APPOINTMENTS,
                json!({ "doctor": booking.doctor_id, "date": booking.date }),
                Some(json!({ "timeSlot.start": 1 })),
            )
            .await?;

        for document in existing {
            let appointment: Appointment = serde_json::from_value(document).map_err(|e| {
                AppointmentError::Database(format!("Failed to parse appointment: {}", e))
            })?;
            if appointment.time_slot.overlaps(&booking.slot) {
                warn!(
                    "Booking conflict for doctor {} on {}: requested {:?} overlaps {:?}",
                    booking.doctor_id, booking.date, booking.slot, appointment.time_slot
                );
                return Err(AppointmentError::Conflict);
            }
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient: booking.patient_id,
            doctor: booking.doctor_id,
            date: booking.date,
            time_slot: booking.slot,
            description: booking.description.clone(),
            payment_status: booking.payment_status,
            created_at: Utc::now(),
        };

        let document = serde_json::to_value(&appointment)
            .map_err(|e| AppointmentError::Database(e.to_string()))?;
        self.store.insert_one(APPOINTMENTS, document).await?;

        debug!(
            "Appointment {} booked for doctor {} on {}",
            appointment.id, booking.doctor_id, booking.date
        );

        let patient = self.populate_user(booking.patient_id).await?;
        let doctor = self
            .store
            .find_one(DOCTORS, json!({ "_id": booking.doctor_id }))
            .await?
            .unwrap_or(Value::Null);

        Ok(BookingConfirmation {
            appointment,
            patient,
            doctor,
        })
    }

    /// All booked slots for a doctor, grouped by date in ascending order.
    pub async fn booked_time_slots(
        &self,
        doctor_id: Uuid,
    ) -> Result<BTreeMap<NaiveDate, BookedDay>, AppointmentError> {
        let documents = self
            .store
            .find(
                APPOINTMENTS,
                json!({ "doctor": doctor_id }),
                Some(json!({ "date": 1, "timeSlot.start": 1 })),
            )
            .await?;

        let mut grouped: BTreeMap<NaiveDate, BookedDay> = BTreeMap::new();
        for document in documents {
            let appointment: Appointment = serde_json::from_value(document).map_err(|e| {
                AppointmentError::Database(format!("Failed to parse appointment: {}", e))
            })?;
            grouped
                .entry(appointment.date)
                .or_default()
                .time_slots
                .push(appointment.time_slot);
        }

        Ok(grouped)
    }

    /// A patient's appointments with the doctor records attached.
    pub async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Value>, AppointmentError> {
        let documents = self
            .store
            .find(
                APPOINTMENTS,
                json!({ "patient": patient_id }),
                Some(json!({ "date": 1, "timeSlot.start": 1 })),
            )
            .await?;

        let mut results = Vec::with_capacity(documents.len());
        for document in documents {
            let appointment: Appointment = serde_json::from_value(document).map_err(|e| {
                AppointmentError::Database(format!("Failed to parse appointment: {}", e))
            })?;
            let doctor = self
                .store
                .find_one(DOCTORS, json!({ "_id": appointment.doctor }))
                .await?
                .unwrap_or(Value::Null);

            let mut entry = serde_json::to_value(&appointment)
                .map_err(|e| AppointmentError::Database(e.to_string()))?;
            entry["doctor"] = doctor;
            results.push(entry);
        }

        Ok(results)
    }

    /// A doctor's appointments with the patient records attached.
    pub async fn appointments_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<Value>, AppointmentError> {
        let documents = self
            .store
            .find(
                APPOINTMENTS,
                json!({ "doctor": doctor_id }),
                Some(json!({ "date": 1, "timeSlot.start": 1 })),
            )
            .await?;

        let mut results = Vec::with_capacity(documents.len());
        for document in documents {
            let appointment: Appointment = serde_json::from_value(document).map_err(|e| {
                AppointmentError::Database(format!("Failed to parse appointment: {}", e))
            })?;
            let patient = self.populate_user(appointment.patient).await?;

            let mut entry = serde_json::to_value(&appointment)
                .map_err(|e| AppointmentError::Database(e.to_string()))?;
            entry["patient"] = patient.unwrap_or(Value::Null);
            results.push(entry);
        }

        Ok(results)
    }

    /// Cancel an appointment. Rescheduling is cancel + rebook, never an
    /// in-place edit.
    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), AppointmentError> {
        let existing = self
            .store
            .find_one(APPOINTMENTS, json!({ "_id": id }))
            .await?;
        if existing.is_none() {
            return Err(AppointmentError::NotFound);
        }

        self.store
            .delete_one(APPOINTMENTS, json!({ "_id": id }))
            .await?;

        Ok(())
    }

    fn parse_request(request: BookAppointmentRequest) -> Result<ValidatedBooking, AppointmentError> {
        let (Some(user), Some(doctor), Some(date), Some(slot)) = (
            request.user,
            request.doctor,
            request.date,
            request.time_slot,
        ) else {
            return Err(AppointmentError::MissingFields);
        };

        let patient_id =
            Uuid::parse_str(&user).map_err(|_| AppointmentError::InvalidId(user.clone()))?;
        let doctor_id =
            Uuid::parse_str(&doctor).map_err(|_| AppointmentError::InvalidId(doctor.clone()))?;

        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| AppointmentError::InvalidDate)?;

        let start = NaiveTime::parse_from_str(&slot.start, "%H:%M")
            .map_err(|_| AppointmentError::InvalidTime(slot.start.clone()))?;
        let end = NaiveTime::parse_from_str(&slot.end, "%H:%M")
            .map_err(|_| AppointmentError::InvalidTime(slot.end.clone()))?;
        if start >= end {
            return Err(AppointmentError::StartNotBeforeEnd);
        }

        Ok(ValidatedBooking {
            patient_id,
            doctor_id,
            date,
            slot: TimeSlot { start, end },
            description: request.description,
            payment_status: request.payment_status.unwrap_or(false),
        })
    }

    async fn fetch_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppointmentError> {
        let document = self
            .store
            .find_one(DOCTORS, json!({ "_id": doctor_id }))
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        serde_json::from_value(document)
            .map_err(|e| AppointmentError::Database(format!("Failed to parse doctor: {}", e)))
    }

    async fn populate_user(&self, user_id: Uuid) -> Result<Option<Value>, AppointmentError> {
        let Some(document) = self
            .store
            .find_one(USERS, json!({ "_id": user_id }))
            .await?
        else {
            return Ok(None);
        };

        // Strip the password hash by round-tripping the typed account.
        let user: UserAccount = serde_json::from_value(document)
            .map_err(|e| AppointmentError::Database(format!("Failed to parse user: {}", e)))?;
        let value =
            serde_json::to_value(&user).map_err(|e| AppointmentError::Database(e.to_string()))?;
        Ok(Some(value))
    }
}
