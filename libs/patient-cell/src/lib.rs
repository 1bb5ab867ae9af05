pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::ProfileExtras;
pub use services::{LocalProfileStore, PatientService};
