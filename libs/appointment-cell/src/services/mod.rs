pub mod booking;
pub mod lock;

pub use booking::BookingService;
