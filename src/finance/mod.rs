//! Finance ledger entries
//!
//! Disbursement and repayment entries are recorded best-effort after the
//! corresponding loan transition commits. The store gives per-statement
//! atomicity only, so these writes are decoupled from the primary transition
//! and safe to retry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Kind of finance entry
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "finance_entry_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinanceEntryKind {
    /// Funds disbursed to the customer (amount = principal)
    Disbursement,
    /// Full repayment received (amount = total repayment)
    Repayment,
}

/// Finance entry model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinanceEntry {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub kind: FinanceEntryKind,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Finance ledger for recording money movement entries
#[derive(Clone)]
pub struct FinanceLedger {
    db_pool: PgPool,
}

impl FinanceLedger {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Record one entry for a loan.
    pub async fn record(
        &self,
        loan_id: Uuid,
        kind: FinanceEntryKind,
        amount: i64,
    ) -> Result<FinanceEntry> {
        let entry = sqlx::query_as::<_, FinanceEntry>(
            r#"
            INSERT INTO finance_entries (id, loan_id, kind, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(loan_id)
        .bind(kind)
        .bind(amount)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to insert finance entry")?;

        tracing::info!(loan_id = %loan_id, kind = ?kind, amount, "Finance entry recorded");

        Ok(entry)
    }

    /// List entries for a loan, oldest first.
    pub async fn entries_for_loan(&self, loan_id: Uuid) -> Result<Vec<FinanceEntry>> {
        let entries = sqlx::query_as::<_, FinanceEntry>(
            "SELECT * FROM finance_entries WHERE loan_id = $1 ORDER BY created_at",
        )
        .bind(loan_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Failed to load finance entries")?;

        Ok(entries)
    }
}
