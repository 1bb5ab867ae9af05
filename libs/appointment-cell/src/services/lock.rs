use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::{DataApiClient, StoreError};

const BOOKING_LOCKS: &str = "booking_locks";

/// How long an acquired lock stays valid before a crashed holder's lock can
/// be reclaimed.
const LOCK_TTL_SECONDS: i64 = 30;

/// Per-(doctor, date) booking lock backed by a conditional insert on a
/// unique `_id`. Serializes the overlap-check-and-insert sequence so two
/// concurrent bookings for the same doctor and day cannot interleave.
pub struct BookingLockService<'a> {
    store: &'a DataApiClient,
}

impl<'a> BookingLockService<'a> {
    pub fn new(store: &'a DataApiClient) -> Self {
        Self { store }
    }

    fn lock_key(doctor_id: Uuid, date: NaiveDate) -> String {
        format!("booking:{}:{}", doctor_id, date)
    }

    /// Try to take the lock. Returns false when another holder has it and
    /// its lease has not expired.
    pub async fn acquire(&self, doctor_id: Uuid, date: NaiveDate) -> Result<bool, StoreError> {
        let key = Self::lock_key(doctor_id, date);

        match self.try_insert(&key, doctor_id).await {
            Ok(()) => {
                debug!("Booking lock acquired: {}", key);
                Ok(true)
            }
            Err(StoreError::DuplicateKey) => {
                if self.reclaim_if_expired(&key).await? {
                    match self.try_insert(&key, doctor_id).await {
                        Ok(()) => Ok(true),
                        Err(StoreError::DuplicateKey) => Ok(false),
                        Err(e) => Err(e),
                    }
                } else {
                    Ok(false)
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn release(&self, doctor_id: Uuid, date: NaiveDate) {
        let key = Self::lock_key(doctor_id, date);
        if let Err(e) = self.store.delete_one(BOOKING_LOCKS, json!({ "_id": &key })).await {
            // The TTL will reclaim it; nothing else to do here.
            warn!("Failed to release booking lock {}: {}", key, e);
        }
    }

    async fn try_insert(&self, key: &str, doctor_id: Uuid) -> Result<(), StoreError> {
        let now = Utc::now();
        self.store
            .insert_one(
                BOOKING_LOCKS,
                json!({
                    "_id": key,
                    "doctor": doctor_id,
                    "acquiredAt": now.to_rfc3339(),
                    "expiresAt": (now + Duration::seconds(LOCK_TTL_SECONDS)).to_rfc3339(),
                }),
            )
            .await?;
        Ok(())
    }

    /// Delete the lock document if its lease has lapsed. Returns true when
    /// a new acquisition attempt is worthwhile.
    async fn reclaim_if_expired(&self, key: &str) -> Result<bool, StoreError> {
        let Some(existing) = self
            .store
            .find_one(BOOKING_LOCKS, json!({ "_id": key }))
            .await?
        else {
            // Holder released between our insert attempt and this lookup.
            return Ok(true);
        };

        let expired = existing
            .get("expiresAt")
            .and_then(|v| v.as_str())
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|expires_at| expires_at.with_timezone(&Utc) < Utc::now())
            .unwrap_or(true);

        if expired {
            warn!("Reclaiming expired booking lock: {}", key);
            self.store
                .delete_one(BOOKING_LOCKS, json!({ "_id": key }))
                .await?;
        }

        Ok(expired)
    }
}
