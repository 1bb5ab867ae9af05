pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::Disease;
pub use services::MedicineService;
