mod renew_expired_bookings;

pub use renew_expired_bookings::{RenewExpiredBookingsHandler, RenewalSummary};
