pub mod doctor;
pub mod projector;

pub use doctor::DoctorService;
