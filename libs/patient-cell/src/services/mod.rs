pub mod local_profile;
pub mod patient;

pub use local_profile::LocalProfileStore;
pub use patient::PatientService;
