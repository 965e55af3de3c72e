//! Session extractor
//!
//! Resolves the authenticated customer from the device session so handlers
//! receive an already-resolved customer instead of touching auth state.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::customer::Customer;
use crate::error::ApiError;

/// Header carrying the caller's device identifier
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Customer resolved from an active device session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(customer: AuthenticatedCustomer) -> impl IntoResponse {
///     format!("Hello, {}", customer.0.full_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedCustomer(pub Customer);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedCustomer
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let device_id = parts
            .headers
            .get(DEVICE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthorized(format!("{} header required", DEVICE_ID_HEADER))
                    .into_response()
            })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let customer = auth_service
            .resolve_customer(device_id)
            .await
            .map_err(|e| ApiError::from(e).into_response())?
            .ok_or_else(|| {
                ApiError::Unauthorized("No active session for this device".to_string())
                    .into_response()
            })?;

        Ok(AuthenticatedCustomer(customer))
    }
}
