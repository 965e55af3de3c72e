//! Loan lifecycle integration tests
//!
//! These exercise the full state machine against a real Postgres instance
//! and are ignored by default. Run with:
//!
//! ```text
//! TEST_DATABASE_URL=postgresql://localhost/loandesk_test cargo test -- --ignored
//! ```

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use loandesk_server::customer::{CustomerService, CustomerState, RegisterCustomerRequest};
use loandesk_server::finance::FinanceLedger;
use loandesk_server::loan::{CreateLoanRequest, LoanError, LoanService, LoanStatus, PlanKey};
use loandesk_server::risk::RiskService;

/// Helper to create a test database pool
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/loandesk_test".to_string());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn loan_service(pool: &PgPool) -> LoanService {
    LoanService::new(
        pool.clone(),
        FinanceLedger::new(pool.clone()),
        RiskService::new(pool.clone()),
    )
}

/// Register a throwaway customer with a unique phone number
async fn register_customer(pool: &PgPool) -> Uuid {
    let suffix: u64 = rand_suffix();
    let customer = CustomerService::new(pool.clone())
        .register(RegisterCustomerRequest {
            full_name: "Test Customer".to_string(),
            phone: format!("+9199{:010}", suffix % 10_000_000_000),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            email: None,
        })
        .await
        .expect("Failed to register customer");
    customer.id
}

fn rand_suffix() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

fn create_request(amount: i64) -> CreateLoanRequest {
    CreateLoanRequest { amount, plan: None }
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_single_open_loan_per_customer() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_id = register_customer(&pool).await;

    let first = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("first loan should be created");
    assert_eq!(first.status, LoanStatus::Pending);

    let second = service.create(customer_id, create_request(20_000)).await;
    assert!(matches!(second, Err(LoanError::DuplicateActiveLoan)));

    // Still blocked after approval: the loan is active, not gone
    service.approve(first.id).await.expect("approve");
    let third = service.create(customer_id, create_request(20_000)).await;
    assert!(matches!(third, Err(LoanError::DuplicateActiveLoan)));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_approval_determinism() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_id = register_customer(&pool).await;

    let loan = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("create");
    assert_eq!(loan.total_repayment, 11_500);

    let before = Utc::now();
    let outcome = service.approve(loan.id).await.expect("approve");
    let approved = outcome.loan;

    assert_eq!(approved.status, LoanStatus::Active);
    assert_eq!(approved.total_repayment, 11_500);
    assert_eq!(approved.monthly_interest, 15);

    let approved_at = approved.approved_at.expect("approved_at set");
    assert!(approved_at >= before);
    assert_eq!(
        approved.due_date.expect("due date"),
        approved_at + Duration::days(30)
    );
    assert_eq!(
        approved.final_deadline.expect("final deadline"),
        approved_at + Duration::days(90)
    );
    assert!(outcome.secondary_failure.is_none());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_escalation_cycle_and_ceiling() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_id = register_customer(&pool).await;

    let loan = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("create");
    let approved = service.approve(loan.id).await.expect("approve").loan;
    let first_due = approved.due_date.unwrap();

    let after_first = service
        .record_interest_cycle(loan.id)
        .await
        .expect("first cycle");
    assert_eq!(after_first.monthly_interest, 18);
    assert_eq!(after_first.total_repayment, 11_800);
    assert_eq!(after_first.due_date.unwrap(), first_due + Duration::days(30));
    assert_eq!(after_first.interest_paid_count, 1);
    // The outer bound does not move
    assert_eq!(after_first.final_deadline, approved.final_deadline);

    let after_second = service
        .record_interest_cycle(loan.id)
        .await
        .expect("second cycle");
    assert_eq!(after_second.monthly_interest, 21);
    assert_eq!(after_second.total_repayment, 12_100);
    assert_eq!(after_second.interest_paid_count, 2);

    // At the ceiling: no further escalation and no state change
    let blocked = service.record_interest_cycle(loan.id).await;
    assert!(matches!(blocked, Err(LoanError::MaxEscalationReached)));

    let unchanged = service.get_loan(loan.id).await.expect("get").unwrap();
    assert_eq!(unchanged.monthly_interest, 21);
    assert_eq!(unchanged.interest_paid_count, 2);
    assert_eq!(unchanged.due_date, after_second.due_date);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_rejection_drives_suspension() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_service = CustomerService::new(pool.clone());
    let customer_id = register_customer(&pool).await;

    // First rejection today: counted, not suspended
    let loan = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("create");
    service.reject(loan.id).await.expect("reject");

    let customer = customer_service
        .get_customer(customer_id)
        .await
        .expect("get")
        .unwrap();
    assert_eq!(customer.rejection_count, 1);
    assert_eq!(customer.state, CustomerState::Active);

    // Second rejection the same day: suspended
    let loan = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("create again");
    service.reject(loan.id).await.expect("reject again");

    let customer = customer_service
        .get_customer(customer_id)
        .await
        .expect("get")
        .unwrap();
    assert_eq!(customer.rejection_count, 2);
    assert_eq!(customer.state, CustomerState::Suspended);

    // Suspension blocks new loans
    let blocked = service.create(customer_id, create_request(10_000)).await;
    assert!(matches!(blocked, Err(LoanError::InvalidPrecondition(_))));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_terminal_transitions_are_not_reentrant() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_id = register_customer(&pool).await;

    let loan = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("create");
    service.approve(loan.id).await.expect("approve");
    service.close(loan.id).await.expect("close");

    // Closing a closed loan
    let closed_again = service.close(loan.id).await;
    assert!(matches!(closed_again, Err(LoanError::InvalidPrecondition(_))));

    // Approving a closed loan
    let approved_again = service.approve(loan.id).await;
    assert!(matches!(
        approved_again,
        Err(LoanError::InvalidPrecondition(_))
    ));

    let unchanged = service.get_loan(loan.id).await.expect("get").unwrap();
    assert_eq!(unchanged.status, LoanStatus::Closed);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_concurrent_approves_have_one_winner() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_id = register_customer(&pool).await;

    let loan = service
        .create(customer_id, create_request(10_000))
        .await
        .expect("create");

    let (a, b) = tokio::join!(service.approve(loan.id), service.approve(loan.id));

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|&&ok| ok).count();
    assert_eq!(successes, 1, "exactly one approve must win");

    for result in [&a, &b] {
        if let Err(e) = result {
            assert!(
                matches!(e, LoanError::StaleState | LoanError::InvalidPrecondition(_)),
                "loser must see a stale or precondition failure, got {:?}",
                e
            );
        }
    }
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_plan_selection_and_growth_terms() {
    let pool = setup_test_db().await;
    let service = loan_service(&pool);
    let customer_id = register_customer(&pool).await;

    let loan = service
        .create(
            customer_id,
            CreateLoanRequest {
                amount: 50_000,
                plan: Some(PlanKey::Growth),
            },
        )
        .await
        .expect("create");

    assert_eq!(loan.duration_days, 60);
    assert_eq!(loan.monthly_interest, 18);
    assert_eq!(loan.total_repayment, 59_000);

    let approved = service.approve(loan.id).await.expect("approve").loan;
    let approved_at = approved.approved_at.unwrap();
    assert_eq!(approved.due_date.unwrap(), approved_at + Duration::days(60));
    assert_eq!(
        approved.final_deadline.unwrap(),
        approved_at + Duration::days(180)
    );
}
