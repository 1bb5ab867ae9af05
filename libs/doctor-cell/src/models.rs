use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::account::AccountType;
use shared_models::time::TimeWindow;

fn default_available_days() -> Vec<String> {
    vec![
        "Monday".to_string(),
        "Tuesday".to_string(),
        "Wednesday".to_string(),
        "Thursday".to_string(),
        "Friday".to_string(),
    ]
}

fn default_window() -> TimeWindow {
    TimeWindow {
        start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
    }
}

/// A doctor document from the `doctors` collection. Scheduling fields fall
/// back to the stock Monday-Friday 09:00-17:00 schedule when a profile has
/// never been filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub consultant_fee: Option<f64>,
    #[serde(default)]
    pub experience: Option<i32>,
    #[serde(default)]
    pub degrees: Vec<String>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default = "default_available_days")]
    pub available_days: Vec<String>,
    #[serde(default = "default_window")]
    pub available_time_slot: TimeWindow,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn is_available_on(&self, weekday_name: &str) -> bool {
        self.available_days.iter().any(|day| day == weekday_name)
    }
}

/// A doctor with their user record attached, password hash stripped.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorWithUser {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub user: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDoctorsQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialization: Option<String>,
}

/// Combined profile update: common user fields plus the role profile,
/// switched on `accountType`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub account_type: AccountType,

    // Common user fields
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub blood_group: Option<String>,
    pub image: Option<String>,

    // Doctor profile fields
    pub specialization: Option<String>,
    pub consultant_fee: Option<f64>,
    pub experience: Option<i32>,
    pub degrees: Option<Vec<String>>,
    pub certification: Option<String>,
    pub available_days: Option<Vec<String>>,
    pub available_time_slot: Option<TimeWindow>,
}

/// One projected calendar day: bookable 12-hour slot labels for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub day: String,
    pub slots: Vec<String>,
}
