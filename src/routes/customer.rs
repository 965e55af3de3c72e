//! Customer route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::customer::*;
use crate::state::AppState;

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/customers", post(register))
        .route("/api/customers/:id", get(get_customer))
}
