//! Customer service layer - registration and lookups

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Customer, CustomerState, RegisterCustomerRequest};

/// Customer service errors
#[derive(Error, Debug)]
pub enum CustomerError {
    #[error("Customer not found")]
    NotFound,

    #[error("Phone number is already registered")]
    PhoneAlreadyRegistered,

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Customer service for registration and lookups
#[derive(Clone)]
pub struct CustomerService {
    db_pool: PgPool,
}

impl CustomerService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Register a new customer. New accounts start active with a zeroed
    /// rejection counter.
    pub async fn register(
        &self,
        request: RegisterCustomerRequest,
    ) -> Result<Customer, CustomerError> {
        let result = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, full_name, phone, dob, email, state)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.full_name)
        .bind(&request.phone)
        .bind(request.dob)
        .bind(&request.email)
        .bind(CustomerState::Active)
        .fetch_one(&self.db_pool)
        .await;

        match result {
            Ok(customer) => {
                tracing::info!(customer_id = %customer.id, "Customer registered");
                Ok(customer)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(CustomerError::PhoneAlreadyRegistered)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>, CustomerError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(customer)
    }

    /// Get a customer by phone number
    pub async fn get_by_phone(&self, phone: &str) -> Result<Option<Customer>, CustomerError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(customer)
    }
}
