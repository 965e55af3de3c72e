//! Loan route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::loan::*;
use crate::state::AppState;

pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/loans", post(create_loan))
        .route("/api/loans/active", get(get_active_loan))
        .route("/api/loans/:id", get(get_loan_status))
        .route("/api/loans/:id/approve", post(approve_loan))
        .route("/api/loans/:id/reject", post(reject_loan))
        .route("/api/loans/:id/interest-cycle", post(record_interest_cycle))
        .route("/api/loans/:id/close", post(close_loan))
}
