//! Loan models for LoanDesk

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use super::plan::PlanKey;

/// Loan status enum
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Active,
    Rejected,
    Closed,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Active => "active",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Loan model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Loan {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Principal in positive integer currency units
    pub amount: i64,
    pub duration_days: i32,
    /// Monthly interest rate in whole percent
    pub monthly_interest: i32,
    /// Principal plus accrued interest; recomputed on escalation
    pub total_repayment: i64,
    pub status: LoanStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub final_deadline: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    /// Escalation cycles applied so far
    pub interest_paid_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new loan
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoanRequest {
    #[validate(range(min = 5_000, max = 1_000_000))]
    pub amount: i64,

    /// Omitted means the standard (starter) plan
    pub plan: Option<PlanKey>,
}

/// Status view of a loan as returned to callers
#[derive(Debug, Serialize)]
pub struct LoanStatusView {
    pub status: LoanStatus,
    pub amount: i64,
    pub total_repayment: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub final_deadline: Option<DateTime<Utc>>,
    pub monthly_interest_rate: i32,
}

impl From<&Loan> for LoanStatusView {
    fn from(loan: &Loan) -> Self {
        Self {
            status: loan.status,
            amount: loan.amount,
            total_repayment: loan.total_repayment,
            due_date: loan.due_date,
            final_deadline: loan.final_deadline,
            monthly_interest_rate: loan.monthly_interest,
        }
    }
}
