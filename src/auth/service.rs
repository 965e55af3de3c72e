//! Authentication service
//!
//! OTP request/verify flows and device-session management. Code delivery is
//! out of scope: the generated code is written to the log, where a delivery
//! gateway would pick it up.

use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::customer::Customer;

use super::model::{CustomerSession, OtpRequest};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid or expired OTP")]
    OtpInvalid,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Session not found or inactive")]
    SessionNotFound,

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    otp_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(db_pool: PgPool, otp_ttl_minutes: i64) -> Self {
        Self {
            db_pool,
            otp_ttl_minutes,
        }
    }

    /// Issue an OTP for a phone number.
    ///
    /// An unexpired, unused code for the same phone is reused instead of
    /// invalidating it with a fresh one.
    pub async fn request_otp(&self, phone: &str) -> Result<(), AuthError> {
        let existing = sqlx::query_as::<_, OtpRequest>(
            r#"
            SELECT * FROM otp_requests
            WHERE phone = $1 AND used = false AND expires_at > now()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.db_pool)
        .await?;

        if let Some(otp) = existing {
            tracing::info!(phone = %phone, code = %otp.otp_code, "Reusing valid OTP");
            return Ok(());
        }

        let code = generate_otp_code();
        let expires_at = Utc::now() + Duration::minutes(self.otp_ttl_minutes);

        sqlx::query(
            r#"
            INSERT INTO otp_requests (id, phone, otp_code, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone)
        .bind(&code)
        .bind(expires_at)
        .execute(&self.db_pool)
        .await?;

        // Stand-in for the delivery gateway
        tracing::info!(phone = %phone, code = %code, "OTP issued");

        Ok(())
    }

    /// Verify an OTP and open a session for the device.
    ///
    /// Any previous sessions for the customer are deactivated first; one
    /// device is signed in at a time.
    pub async fn verify_otp(
        &self,
        phone: &str,
        code: &str,
        device_id: &str,
    ) -> Result<CustomerSession, AuthError> {
        let otp = sqlx::query_as::<_, OtpRequest>(
            r#"
            SELECT * FROM otp_requests
            WHERE phone = $1 AND used = false
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::OtpInvalid)?;

        if otp.expires_at < Utc::now() {
            return Err(AuthError::OtpExpired);
        }

        if otp.otp_code != code {
            return Err(AuthError::OtpInvalid);
        }

        sqlx::query("UPDATE otp_requests SET used = true WHERE id = $1")
            .bind(otp.id)
            .execute(&self.db_pool)
            .await?;

        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE phone = $1")
                .bind(phone)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or(AuthError::CustomerNotFound)?;

        sqlx::query("UPDATE customer_sessions SET active = false WHERE customer_id = $1")
            .bind(customer.id)
            .execute(&self.db_pool)
            .await?;

        let session = sqlx::query_as::<_, CustomerSession>(
            r#"
            INSERT INTO customer_sessions (id, customer_id, device_id, active)
            VALUES ($1, $2, $3, true)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(customer.id)
        .bind(device_id)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(customer_id = %customer.id, "Session opened");

        Ok(session)
    }

    /// Resolve the customer behind an active device session, if any.
    pub async fn resolve_customer(&self, device_id: &str) -> Result<Option<Customer>, AuthError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT c.* FROM customers c
            JOIN customer_sessions s ON s.customer_id = c.id
            WHERE s.device_id = $1 AND s.active = true
            ORDER BY s.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(customer)
    }

    /// Deactivate all sessions for a device.
    pub async fn logout(&self, device_id: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE customer_sessions SET active = false WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }
}

fn generate_otp_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
