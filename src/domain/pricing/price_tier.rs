//! PriceTier reference entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PriceTierId, Timestamp};
use crate::domain::subscription::Frequency;

/// One price per subscription frequency.
///
/// At most one active tier may exist per frequency; duplicates surface as a
/// conflict error at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Unique identifier for this tier.
    pub id: PriceTierId,

    /// Frequency this tier prices.
    pub frequency: Frequency,

    /// Price per cleaning hour for this frequency.
    pub price_per_hour: f64,

    /// Whether this tier is currently offered.
    pub is_active: bool,

    /// When the tier was created.
    pub created_at: Timestamp,

    /// When the tier was last updated.
    pub updated_at: Timestamp,
}

impl PriceTier {
    /// Creates a new active tier.
    pub fn new(id: PriceTierId, frequency: Frequency, price_per_hour: f64) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            frequency,
            price_per_hour,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Session price for a visit of the given duration.
    pub fn session_price(&self, hours: u32) -> f64 {
        self.price_per_hour * f64::from(hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tier_is_active() {
        let tier = PriceTier::new(PriceTierId::new(), Frequency::Weekly, 40.0);
        assert!(tier.is_active);
        assert_eq!(tier.frequency, Frequency::Weekly);
    }

    #[test]
    fn session_price_scales_with_hours() {
        let tier = PriceTier::new(PriceTierId::new(), Frequency::Biweekly, 45.5);
        assert_eq!(tier.session_price(3), 136.5);
        assert_eq!(tier.session_price(0), 0.0);
    }
}
