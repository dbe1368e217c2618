//! # REST API for Payments
//!
//! Endpoints for payment history, the channel catalog, and paying fees.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::domain::models::payment_method::PAYMENT_CHANNELS;
use crate::domain::models::student::StudentContext;
use crate::domain::{settlement_message, PaymentError, PaymentLedger};
use crate::storage::{FeeStorage, PaymentStorage};
use crate::AppState;
use shared::{InitiatePaymentRequest, InitiatePaymentResponse, PaymentMethod};

/// Query parameters identifying the student whose records to read
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: String,
}

/// List a student's payments, most recent first
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> impl IntoResponse {
    info!("GET /api/payments - student: {}", query.student_id);

    match state
        .payment_repository
        .list_payments(&query.student_id)
        .await
    {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(e) => {
            error!("Failed to list payments: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing payments").into_response()
        }
    }
}

/// The fixed catalog of payment channels
pub async fn list_payment_methods() -> impl IntoResponse {
    let methods: Vec<PaymentMethod> = PAYMENT_CHANNELS
        .iter()
        .map(|channel| channel.to_dto())
        .collect();
    (StatusCode::OK, Json(methods)).into_response()
}

/// Pay the student's next outstanding fee through the requested channel
pub async fn initiate_payment(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
    Json(request): Json<InitiatePaymentRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/payments - student: {}, method: {}",
        query.student_id, request.method
    );

    let (fees, payments) = tokio::join!(
        state.fee_repository.list_fees(&query.student_id),
        state.payment_repository.list_payments(&query.student_id),
    );
    let (fees, payments) = match (fees, payments) {
        (Ok(fees), Ok(payments)) => (fees, payments),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to load records for payment: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error loading records").into_response();
        }
    };

    let ledger = PaymentLedger::build(&payments);
    let student = StudentContext::new(query.student_id.clone());

    match state
        .payment_service
        .initiate_payment(&student, &request.method, &fees, &ledger)
        .await
    {
        Ok(payment) => {
            let success_message = settlement_message(&payment);
            (
                StatusCode::CREATED,
                Json(InitiatePaymentResponse {
                    payment,
                    success_message,
                }),
            )
                .into_response()
        }
        Err(e @ PaymentError::UnknownMethod(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) if e.is_informational() => (StatusCode::CONFLICT, e.to_string()).into_response(),
        Err(e) => {
            error!("Failed to record payment: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
