pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Appointment, BookAppointmentRequest, BookingConfirmation};
pub use services::BookingService;
