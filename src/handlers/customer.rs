//! Customer HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::customer::{Customer, RegisterCustomerRequest};
use crate::error::{ApiError, ApiResult};
use crate::models::ApiResponse;
use crate::state::AppState;

/// POST /api/customers - Register a new customer
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterCustomerRequest>,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    request.validate()?;

    let customer = state.customer_service.register(request).await?;

    Ok(Json(ApiResponse::ok(customer)))
}

/// GET /api/customers/:id - Fetch a customer by id
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    let customer = state
        .customer_service
        .get_customer(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    Ok(Json(ApiResponse::ok(customer)))
}
