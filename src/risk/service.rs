//! Risk service - persists rejection counting and suspension

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::customer::{Customer, CustomerState};

use super::policy::{self, RejectionOutcome};

/// Risk service errors
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Risk service owning customer state transitions (active -> suspended)
#[derive(Clone)]
pub struct RiskService {
    db_pool: PgPool,
}

impl RiskService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Record a loan rejection against a customer and suspend the account on
    /// the second same-day rejection.
    ///
    /// Never reactivates: a suspended customer stays suspended regardless of
    /// what the counter does afterwards.
    pub async fn on_rejection(&self, customer_id: Uuid) -> Result<RejectionOutcome, RiskError> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or(RiskError::CustomerNotFound)?;

        let today = Utc::now().date_naive();
        let outcome = policy::on_rejection(
            customer.rejection_count,
            customer.last_rejection_date,
            today,
        );

        if outcome.suspend {
            sqlx::query(
                r#"
                UPDATE customers
                SET rejection_count = $2,
                    last_rejection_date = $3,
                    state = 'suspended',
                    updated_at = now()
                WHERE id = $1
                "#,
            )
            .bind(customer_id)
            .bind(outcome.rejection_count)
            .bind(today)
            .execute(&self.db_pool)
            .await?;

            if customer.state == CustomerState::Active {
                tracing::warn!(
                    customer_id = %customer_id,
                    rejection_count = outcome.rejection_count,
                    "Customer suspended after repeated same-day rejections"
                );
            }
        } else {
            sqlx::query(
                r#"
                UPDATE customers
                SET rejection_count = $2,
                    last_rejection_date = $3,
                    updated_at = now()
                WHERE id = $1
                "#,
            )
            .bind(customer_id)
            .bind(outcome.rejection_count)
            .bind(today)
            .execute(&self.db_pool)
            .await?;
        }

        Ok(outcome)
    }
}
