//! Authentication models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// One-time passcode issued for a phone number
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct OtpRequest {
    pub id: Uuid,
    pub phone: String,
    pub otp_code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

/// Device-bound customer session
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerSession {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub device_id: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
