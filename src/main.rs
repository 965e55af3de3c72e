//! LoanDesk Backend Server
//!
//! Serves the microloan API: customer registration, OTP login, loan
//! lifecycle operations and interest escalation.

use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use loandesk_server::auth::AuthService;
use loandesk_server::config::Config;
use loandesk_server::customer::CustomerService;
use loandesk_server::db;
use loandesk_server::finance::FinanceLedger;
use loandesk_server::loan::LoanService;
use loandesk_server::risk::RiskService;
use loandesk_server::routes::api_routes;
use loandesk_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting LoanDesk server");

    // Database pool and migrations
    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    // Services
    let finance_ledger = FinanceLedger::new(db_pool.clone());
    let risk_service = RiskService::new(db_pool.clone());
    let loan_service = Arc::new(LoanService::new(
        db_pool.clone(),
        finance_ledger,
        risk_service,
    ));
    let customer_service = Arc::new(CustomerService::new(db_pool.clone()));
    let auth_service = Arc::new(AuthService::new(db_pool.clone(), config.otp_ttl_minutes));

    let app_state = AppState::new(
        loan_service,
        customer_service,
        auth_service,
        db::Database::new(db_pool),
    );

    // CORS: explicit origins in production, permissive otherwise
    let cors = match &config.cors_allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
    };

    let app = api_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
