//! Pricing catalog port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::pricing::PriceTier;
use crate::domain::subscription::Frequency;

/// Lookup port for the per-frequency price list.
#[async_trait]
pub trait PricingCatalog: Send + Sync {
    /// The active price tier for the given frequency.
    ///
    /// Returns `None` when no active tier is configured for that frequency;
    /// callers decide whether that is an error (it is for subscription
    /// creation).
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on lookup failure
    async fn price_for(&self, frequency: Frequency) -> Result<Option<PriceTier>, DomainError>;
}
