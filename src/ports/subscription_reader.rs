//! Subscription reader port (read side / aggregate queries).
//!
//! Listing, reminder, and renewal-candidate queries over subscriptions joined
//! with their current booking and subscriber contact. Like the booking reader,
//! every method is best-effort: implementations log failures and return empty
//! results instead of erroring.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::booking::Booking;
use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{Frequency, Subscription};

use super::booking_reader::SubscriberContact;

/// Sort key for subscription listings. Both orders are newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSortKey {
    /// Order by the subscription's next scheduled date, descending.
    NextScheduleDate,

    /// Order by the current booking's cleaning date, descending.
    BookingDate,
}

impl Default for SubscriptionSortKey {
    fn default() -> Self {
        Self::NextScheduleDate
    }
}

/// Filter and pagination parameters for [`SubscriptionReader::list`].
///
/// All filters are optional and combine with AND. Date ranges are
/// half-open: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionQuery {
    /// Include soft-deleted subscriptions. Defaults to active-only.
    pub include_inactive: bool,

    /// Restrict to one frequency.
    pub frequency: Option<Frequency>,

    /// Current booking cleaning date at or after this instant.
    pub cleaning_date_from: Option<Timestamp>,

    /// Current booking cleaning date before this instant.
    pub cleaning_date_to: Option<Timestamp>,

    /// Next schedule date at or after this instant.
    pub next_schedule_from: Option<Timestamp>,

    /// Next schedule date before this instant.
    pub next_schedule_to: Option<Timestamp>,

    /// Sort order; defaults to next-schedule-date descending.
    pub sort: Option<SubscriptionSortKey>,

    /// Zero-based page index.
    pub page: u32,

    /// Page size. Implementations clamp 0 to a sensible default.
    pub per_page: u32,
}

/// A subscription joined with its current booking and subscriber contact.
///
/// `booking` is `None` when the subscription has no current booking attached,
/// which can happen transiently between creation steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionWithBooking {
    /// The subscription itself.
    pub subscription: Subscription,

    /// The current booking, if one is attached.
    pub booking: Option<Booking>,

    /// Subscriber owning this subscription.
    pub subscriber: SubscriberContact,
}

/// One page of subscription listing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPage {
    /// Total matching rows across all pages.
    pub count: u64,

    /// Rows for the requested page.
    pub results: Vec<SubscriptionWithBooking>,
}

impl SubscriptionPage {
    /// A page with no results.
    pub fn empty() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }
}

/// Reader port for subscription aggregate queries.
///
/// All methods are best-effort: on storage failure they log and return
/// empty results instead of erroring.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    /// Filtered, sorted, paginated listing.
    ///
    /// The `count` in the returned page reflects the filter across all pages,
    /// not just the returned slice.
    async fn list(&self, query: &SubscriptionQuery) -> SubscriptionPage;

    /// Active subscriptions whose current booking's cleaning date falls in
    /// the window `[today + 4 days, today + 5 days)`, measured from the start
    /// of today.
    ///
    /// Backs the upcoming-visit reminder pass.
    async fn due_for_reminder(&self) -> Vec<SubscriptionWithBooking>;

    /// Active recurring subscriptions whose current booking finished before
    /// today: cleaning date up to the end of yesterday, booking Completed and
    /// payment Completed.
    ///
    /// A subscription-side view of renewal candidacy. The renewal pass itself
    /// drives off expired bookings; this query exists for reporting.
    async fn eligible_for_renewal(&self) -> Vec<SubscriptionWithBooking>;

    /// Active subscriptions with an open visit coming up within seven days:
    /// booking Initiated, payment Pending, cleaning date in
    /// `[now, end of day(now + 7 days)]`. Ascending by cleaning date.
    async fn upcoming_week(&self) -> Vec<SubscriptionWithBooking>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn subscription_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn SubscriptionReader) {}
    }

    #[test]
    fn default_query_is_active_only_first_page() {
        let q = SubscriptionQuery::default();
        assert!(!q.include_inactive);
        assert_eq!(q.page, 0);
        assert!(q.frequency.is_none());
    }

    #[test]
    fn empty_page_has_no_rows() {
        let page = SubscriptionPage::empty();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }
}
