//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::AuthService;
use crate::customer::CustomerService;
use crate::db::Database;
use crate::loan::LoanService;

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub loan_service: Arc<LoanService>,
    pub customer_service: Arc<CustomerService>,
    pub auth_service: Arc<AuthService>,
    pub database: Database,
}

impl AppState {
    pub fn new(
        loan_service: Arc<LoanService>,
        customer_service: Arc<CustomerService>,
        auth_service: Arc<AuthService>,
        database: Database,
    ) -> Self {
        Self {
            loan_service,
            customer_service,
            auth_service,
            database,
        }
    }
}

impl FromRef<AppState> for Arc<LoanService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.loan_service.clone()
    }
}

impl FromRef<AppState> for Arc<CustomerService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.customer_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.database.clone()
    }
}
