//! PostgreSQL implementation of PricingCatalog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::pricing::PriceTier;
use crate::domain::subscription::Frequency;
use crate::ports::PricingCatalog;

use super::rows::PriceTierRow;

/// PostgreSQL implementation of the PricingCatalog port.
pub struct PostgresPricingCatalog {
    pool: PgPool,
}

impl PostgresPricingCatalog {
    /// Creates a new PostgresPricingCatalog with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingCatalog for PostgresPricingCatalog {
    async fn price_for(&self, frequency: Frequency) -> Result<Option<PriceTier>, DomainError> {
        let row: Option<PriceTierRow> = sqlx::query_as(
            r#"
            SELECT id, frequency, price_per_hour, is_active, created_at, updated_at
            FROM price_tiers
            WHERE frequency = $1 AND is_active = TRUE
            "#,
        )
        .bind(frequency.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to look up price tier: {}", e),
            )
        })?;

        row.map(PriceTier::try_from).transpose()
    }
}
