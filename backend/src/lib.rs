//! # Bursary Backend
//!
//! Backend service for the student fee ledger: fees owed, payments made,
//! course enrollments, and everything the portal derives from them.
//!
//! The crate follows a layered architecture:
//! ```text
//! Portal frontend (external)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (CSV repositories behind traits)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with proper CORS configuration
//! - Coordinate between domain logic and data persistence

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::{BreakdownService, FeeService, PaymentService};
use crate::io::rest::{enrollment_apis, fee_apis, payment_apis};
use crate::storage::csv::{EnrollmentRepository, FeeRepository, PaymentRepository};
use crate::storage::{Connection, CsvConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub fee_repository: FeeRepository,
    pub payment_repository: PaymentRepository,
    pub enrollment_repository: EnrollmentRepository,
    pub fee_service: FeeService,
    pub breakdown_service: BreakdownService,
    pub payment_service: PaymentService<CsvConnection>,
}

impl AppState {
    pub fn new(connection: CsvConnection) -> Self {
        let connection = Arc::new(connection);
        Self {
            fee_repository: connection.create_fee_repository(),
            payment_repository: connection.create_payment_repository(),
            enrollment_repository: connection.create_enrollment_repository(),
            fee_service: FeeService::new(),
            breakdown_service: BreakdownService::new(),
            payment_service: PaymentService::new(connection),
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend() -> Result<AppState> {
    info!("Setting up storage");
    let connection = CsvConnection::new_default()?;

    info!("Setting up application state");
    Ok(AppState::new(connection))
}

/// Build the REST router with CORS configured for the portal frontend
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:5173".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/fees", get(fee_apis::list_fees))
        .route("/fees/overview", get(fee_apis::get_fees_overview))
        .route("/fees/breakdown", get(fee_apis::get_course_breakdown))
        .route(
            "/payments",
            get(payment_apis::list_payments).post(payment_apis::initiate_payment),
        )
        .route("/payments/methods", get(payment_apis::list_payment_methods))
        .route("/enrollments", get(enrollment_apis::list_enrollments));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}
