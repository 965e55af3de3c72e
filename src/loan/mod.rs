//! Loan domain: plans, lifecycle state machine and interest escalation

pub mod escalation;
pub mod model;
pub mod plan;
pub mod service;

pub use model::{CreateLoanRequest, Loan, LoanStatus, LoanStatusView};
pub use plan::{Plan, PlanKey};
pub use service::{LoanError, LoanService, OperationOutcome};
