//! Customer models for LoanDesk

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Customer account state. Mutated only by the risk policy (suspension) or by
/// an administrative action outside this service (reactivation).
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "customer_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerState {
    Active,
    Suspended,
}

/// Customer model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub dob: NaiveDate,
    pub email: Option<String>,
    pub state: CustomerState,
    pub rejection_count: i32,
    pub last_rejection_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new customer
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    /// Identity key for login; digits with an optional leading +
    #[validate(custom = "validate_phone")]
    pub phone: String,

    pub dob: NaiveDate,

    #[validate(email)]
    pub email: Option<String>,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}
