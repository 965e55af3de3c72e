//! Route definitions for the LoanDesk API

mod auth;
mod customer;
mod loan;

use axum::{routing::get, Router};

use crate::handlers::health::health;
use crate::state::AppState;

pub use auth::auth_routes;
pub use customer::customer_routes;
pub use loan::loan_routes;

/// Assemble the full API router
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(customer_routes())
        .merge(loan_routes())
}
