//! Loan HTTP handlers
//!
//! Creation and the active-loan view authenticate through the device
//! session; approve/reject/escalate/close are operator actions keyed by loan
//! id alone.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::loan::{CreateLoanRequest, Loan, LoanStatusView, OperationOutcome};
use crate::middleware::AuthenticatedCustomer;
use crate::models::ApiResponse;
use crate::state::AppState;

/// Response for transitions that carry a best-effort secondary step
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub loan: Loan,
    /// Set when the primary transition committed but a follow-up write
    /// (finance entry, risk update) failed and needs reconciliation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<OperationOutcome> for TransitionResponse {
    fn from(outcome: OperationOutcome) -> Self {
        Self {
            loan: outcome.loan,
            warning: outcome.secondary_failure,
        }
    }
}

/// Response wrapper for the active-loan lookup (`loan` is null when none)
#[derive(Debug, Serialize)]
pub struct ActiveLoanResponse {
    pub loan: Option<Loan>,
}

/// POST /api/loans - Create a loan for the authenticated customer
pub async fn create_loan(
    State(state): State<AppState>,
    AuthenticatedCustomer(customer): AuthenticatedCustomer,
    Json(request): Json<CreateLoanRequest>,
) -> ApiResult<Json<ApiResponse<Loan>>> {
    request.validate()?;

    let loan = state.loan_service.create(customer.id, request).await?;

    Ok(Json(ApiResponse::ok(loan)))
}

/// GET /api/loans/active - The authenticated customer's open loan, if any
pub async fn get_active_loan(
    State(state): State<AppState>,
    AuthenticatedCustomer(customer): AuthenticatedCustomer,
) -> ApiResult<Json<ApiResponse<ActiveLoanResponse>>> {
    let loan = state
        .loan_service
        .get_active_loan_for_customer(customer.id)
        .await?;

    Ok(Json(ApiResponse::ok(ActiveLoanResponse { loan })))
}

/// GET /api/loans/:id - Status view of a loan
pub async fn get_loan_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<LoanStatusView>>> {
    let loan = state
        .loan_service
        .get_loan(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loan not found".to_string()))?;

    Ok(Json(ApiResponse::ok(LoanStatusView::from(&loan))))
}

/// POST /api/loans/:id/approve - Activate a pending loan and disburse
pub async fn approve_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TransitionResponse>>> {
    let outcome = state.loan_service.approve(id).await?;

    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/loans/:id/reject - Reject a pending loan
pub async fn reject_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TransitionResponse>>> {
    let outcome = state.loan_service.reject(id).await?;

    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/loans/:id/interest-cycle - Apply one escalation cycle
pub async fn record_interest_cycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Loan>>> {
    let loan = state.loan_service.record_interest_cycle(id).await?;

    Ok(Json(ApiResponse::ok(loan)))
}

/// POST /api/loans/:id/close - Close an active loan on full repayment
pub async fn close_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<TransitionResponse>>> {
    let outcome = state.loan_service.close(id).await?;

    Ok(Json(ApiResponse::ok(outcome.into())))
}
