//! Auth route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::auth::*;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/request-otp", post(request_otp))
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/auth/session", get(session))
        .route("/api/auth/logout", post(logout))
}
