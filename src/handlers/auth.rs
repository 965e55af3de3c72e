//! Authentication HTTP handlers
//!
//! Phone/OTP login and device-session endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::customer::{Customer, CustomerState};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthenticatedCustomer;
use crate::models::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestOtpBody {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpBody {
    pub phone: String,
    pub otp: String,
    pub device_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutBody {
    pub device_id: String,
}

/// Customer as seen by the session endpoint
#[derive(Debug, Serialize)]
pub struct SessionCustomer {
    pub id: uuid::Uuid,
    pub full_name: String,
    pub state: CustomerState,
}

impl From<Customer> for SessionCustomer {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name,
            state: c.state,
        }
    }
}

/// POST /api/auth/request-otp - Issue (or reuse) an OTP for a phone number
pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<RequestOtpBody>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if body.phone.is_empty() {
        return Err(ApiError::BadRequest("Phone number required".to_string()));
    }

    state.auth_service.request_otp(&body.phone).await?;

    Ok(Json(ApiResponse::ok_empty()))
}

/// POST /api/auth/verify-otp - Verify the code and open a device session
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpBody>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if body.phone.is_empty() || body.otp.is_empty() {
        return Err(ApiError::BadRequest("Phone and OTP required".to_string()));
    }

    state
        .auth_service
        .verify_otp(&body.phone, &body.otp, &body.device_id)
        .await?;

    Ok(Json(ApiResponse::ok_empty()))
}

/// GET /api/auth/session - Current customer for the calling device
pub async fn session(
    AuthenticatedCustomer(customer): AuthenticatedCustomer,
) -> ApiResult<Json<ApiResponse<SessionCustomer>>> {
    Ok(Json(ApiResponse::ok(customer.into())))
}

/// POST /api/auth/logout - Deactivate the device's sessions
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<LogoutBody>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.auth_service.logout(&body.device_id).await?;

    Ok(Json(ApiResponse::ok_empty()))
}
