mod update_booking;

pub use update_booking::{UpdateBookingCommand, UpdateBookingHandler};
