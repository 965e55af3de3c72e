//! Loan service layer - the loan lifecycle state machine
//!
//! Each public operation is one transition gated by an explicit precondition
//! on the loan's current status. Preconditions are checked twice: at read
//! time (InvalidPrecondition if already violated) and at write time through a
//! conditional UPDATE (StaleState if the row moved in between), so two racing
//! operations on the same loan resolve to exactly one winner.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::customer::{Customer, CustomerState};
use crate::finance::{FinanceEntryKind, FinanceLedger};
use crate::risk::RiskService;

use super::escalation;
use super::model::{CreateLoanRequest, Loan, LoanStatus};
use super::plan::single_period_repayment;

/// Loan ledger errors
#[derive(Error, Debug)]
pub enum LoanError {
    #[error("Entity not found")]
    NotFound,

    #[error("Invalid precondition: {0}")]
    InvalidPrecondition(String),

    #[error("Customer already has a pending or active loan")]
    DuplicateActiveLoan,

    #[error("Loan state changed concurrently, refetch and retry")]
    StaleState,

    #[error("Interest rate is already at the ceiling, full repayment is due")]
    MaxEscalationReached,

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Result of a transition with a best-effort secondary step.
///
/// The primary transition has committed; `secondary_failure` carries the
/// reason if the follow-up write (finance entry, suspension update) failed
/// and needs reconciliation.
#[derive(Debug)]
pub struct OperationOutcome {
    pub loan: Loan,
    pub secondary_failure: Option<String>,
}

/// Loan service for managing the loan lifecycle
#[derive(Clone)]
pub struct LoanService {
    db_pool: PgPool,
    finance: FinanceLedger,
    risk: RiskService,
}

impl LoanService {
    pub fn new(db_pool: PgPool, finance: FinanceLedger, risk: RiskService) -> Self {
        Self {
            db_pool,
            finance,
            risk,
        }
    }

    /// Create a pending loan for a customer.
    ///
    /// Fails if the customer is suspended or already has a loan in
    /// {pending, active}. One durable insert; no partial state.
    pub async fn create(
        &self,
        customer_id: Uuid,
        request: CreateLoanRequest,
    ) -> Result<Loan, LoanError> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or(LoanError::NotFound)?;

        if customer.state == CustomerState::Suspended {
            return Err(LoanError::InvalidPrecondition(
                "customer is suspended and cannot request loans".to_string(),
            ));
        }

        let open_loan = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM loans WHERE customer_id = $1 AND status IN ('pending', 'active') LIMIT 1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db_pool)
        .await?;

        if open_loan.is_some() {
            return Err(LoanError::DuplicateActiveLoan);
        }

        let plan = request.plan.unwrap_or_default().plan();
        let total_repayment = single_period_repayment(request.amount, plan.monthly_interest);

        let result = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (
                id, customer_id, amount, duration_days, monthly_interest,
                total_repayment, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(customer_id)
        .bind(request.amount)
        .bind(plan.duration_days)
        .bind(plan.monthly_interest)
        .bind(total_repayment)
        .fetch_one(&self.db_pool)
        .await;

        match result {
            Ok(loan) => {
                tracing::info!(
                    loan_id = %loan.id,
                    customer_id = %customer_id,
                    amount = loan.amount,
                    plan = plan.name,
                    "Loan created"
                );
                Ok(loan)
            }
            // The partial unique index on open loans backs the pre-check
            // under concurrent creates.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(LoanError::DuplicateActiveLoan)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Approve a pending loan: activate it, stamp the schedule and disburse.
    ///
    /// The final deadline is the hard outer bound at three plan durations
    /// from approval; escalation cycles never move it.
    pub async fn approve(&self, loan_id: Uuid) -> Result<OperationOutcome, LoanError> {
        let loan = self.require_loan(loan_id).await?;
        require_status(&loan, LoanStatus::Pending, "approve")?;

        let now = Utc::now();
        let due_date = now + Duration::days(loan.duration_days as i64);
        let final_deadline = now + Duration::days(3 * loan.duration_days as i64);
        let total_repayment = single_period_repayment(loan.amount, loan.monthly_interest);

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = 'active',
                approved_at = $2,
                due_date = $3,
                final_deadline = $4,
                total_repayment = $5,
                updated_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(now)
        .bind(due_date)
        .bind(final_deadline)
        .bind(total_repayment)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(LoanError::StaleState)?;

        tracing::info!(
            loan_id = %loan_id,
            due_date = %due_date,
            final_deadline = %final_deadline,
            total_repayment,
            "Loan approved"
        );

        // Disbursement entry is best-effort: its failure is reported but the
        // approval stands.
        let secondary_failure = match self
            .finance
            .record(loan_id, FinanceEntryKind::Disbursement, updated.amount)
            .await
        {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    loan_id = %loan_id,
                    error = %e,
                    "Disbursement entry failed, loan remains approved; reconcile manually"
                );
                Some(format!("disbursement entry failed: {}", e))
            }
        };

        Ok(OperationOutcome {
            loan: updated,
            secondary_failure,
        })
    }

    /// Reject a pending loan and feed the rejection into the risk policy.
    pub async fn reject(&self, loan_id: Uuid) -> Result<OperationOutcome, LoanError> {
        let loan = self.require_loan(loan_id).await?;
        require_status(&loan, LoanStatus::Pending, "reject")?;

        let now = Utc::now();
        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = 'rejected',
                rejected_at = $2,
                updated_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(now)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(LoanError::StaleState)?;

        tracing::info!(loan_id = %loan_id, customer_id = %updated.customer_id, "Loan rejected");

        // Suspension bookkeeping is a decoupled second step: the rejection
        // stands even if it fails.
        let secondary_failure = match self.risk.on_rejection(updated.customer_id).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    customer_id = %updated.customer_id,
                    error = %e,
                    "Rejection recorded but risk update failed; reconcile manually"
                );
                Some(format!("risk update failed: {}", e))
            }
        };

        Ok(OperationOutcome {
            loan: updated,
            secondary_failure,
        })
    }

    /// Close an active loan on full repayment.
    pub async fn close(&self, loan_id: Uuid) -> Result<OperationOutcome, LoanError> {
        let loan = self.require_loan(loan_id).await?;
        require_status(&loan, LoanStatus::Active, "close")?;

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = 'closed',
                updated_at = now()
            WHERE id = $1 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(LoanError::StaleState)?;

        tracing::info!(loan_id = %loan_id, "Loan closed");

        let secondary_failure = match self
            .finance
            .record(loan_id, FinanceEntryKind::Repayment, updated.total_repayment)
            .await
        {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    loan_id = %loan_id,
                    error = %e,
                    "Repayment entry failed, loan remains closed; reconcile manually"
                );
                Some(format!("repayment entry failed: {}", e))
            }
        };

        Ok(OperationOutcome {
            loan: updated,
            secondary_failure,
        })
    }

    /// Apply one interest escalation cycle to an active loan that was not
    /// repaid by its due date.
    pub async fn record_interest_cycle(&self, loan_id: Uuid) -> Result<Loan, LoanError> {
        let loan = self.require_loan(loan_id).await?;
        require_status(&loan, LoanStatus::Active, "escalate")?;

        let due_date = loan.due_date.ok_or_else(|| {
            LoanError::InvalidPrecondition("active loan has no due date".to_string())
        })?;

        let outcome =
            escalation::apply(loan.amount, loan.monthly_interest, due_date, loan.duration_days)
                .ok_or(LoanError::MaxEscalationReached)?;

        // The rate read is pinned in the predicate so concurrent cycles
        // serialize: the loser's condition no longer matches.
        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET monthly_interest = $3,
                due_date = $4,
                total_repayment = $5,
                interest_paid_count = interest_paid_count + 1,
                updated_at = now()
            WHERE id = $1 AND status = 'active' AND monthly_interest = $2
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(loan.monthly_interest)
        .bind(outcome.new_rate)
        .bind(outcome.new_due_date)
        .bind(outcome.new_total_repayment)
        .fetch_optional(&self.db_pool)
        .await?;

        match updated {
            Some(loan) => {
                tracing::info!(
                    loan_id = %loan_id,
                    rate = loan.monthly_interest,
                    due_date = ?loan.due_date,
                    total_repayment = loan.total_repayment,
                    cycle = loan.interest_paid_count,
                    "Interest cycle recorded"
                );
                Ok(loan)
            }
            None => match self.get_loan(loan_id).await? {
                None => Err(LoanError::NotFound),
                Some(current) if current.status != LoanStatus::Active => Err(
                    LoanError::InvalidPrecondition(format!(
                        "cannot escalate a {} loan",
                        current.status
                    )),
                ),
                Some(_) => Err(LoanError::StaleState),
            },
        }
    }

    /// Get a loan by ID
    pub async fn get_loan(&self, loan_id: Uuid) -> Result<Option<Loan>, LoanError> {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(loan_id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(loan)
    }

    /// Latest open (pending or active) loan for a customer, if any.
    ///
    /// The single-active-loan invariant means there is at most one.
    pub async fn get_active_loan_for_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<Loan>, LoanError> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE customer_id = $1 AND status IN ('pending', 'active')
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(loan)
    }

    async fn require_loan(&self, loan_id: Uuid) -> Result<Loan, LoanError> {
        self.get_loan(loan_id).await?.ok_or(LoanError::NotFound)
    }
}

fn require_status(loan: &Loan, expected: LoanStatus, action: &str) -> Result<(), LoanError> {
    if loan.status != expected {
        return Err(LoanError::InvalidPrecondition(format!(
            "cannot {} a {} loan",
            action, loan.status
        )));
    }
    Ok(())
}
