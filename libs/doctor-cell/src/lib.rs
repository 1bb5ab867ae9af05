pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{DayAvailability, Doctor};
pub use services::projector::project_week;
