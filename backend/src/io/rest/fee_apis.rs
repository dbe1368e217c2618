//! # REST API for Fees
//!
//! Endpoints for listing fees and the derived fee summaries.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::domain::PaymentLedger;
use crate::storage::{EnrollmentStorage, FeeStorage, PaymentStorage};
use crate::AppState;

/// Query parameters identifying the student whose records to read
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: String,
}

/// List a student's fees, most recently due first
pub async fn list_fees(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> impl IntoResponse {
    info!("GET /api/fees - student: {}", query.student_id);

    match state.fee_repository.list_fees(&query.student_id).await {
        Ok(fees) => (StatusCode::OK, Json(fees)).into_response(),
        Err(e) => {
            error!("Failed to list fees: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing fees").into_response()
        }
    }
}

/// Aggregate fee position for a student
///
/// Fees and payments are fetched concurrently; the aggregates are only
/// computed once both reads have resolved.
pub async fn get_fees_overview(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> impl IntoResponse {
    info!("GET /api/fees/overview - student: {}", query.student_id);

    let (fees, payments) = tokio::join!(
        state.fee_repository.list_fees(&query.student_id),
        state.payment_repository.list_payments(&query.student_id),
    );

    match (fees, payments) {
        (Ok(fees), Ok(payments)) => {
            let ledger = PaymentLedger::build(&payments);
            let overview = state.fee_service.overview(&fees, &ledger);
            (StatusCode::OK, Json(overview)).into_response()
        }
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to compute fees overview: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error computing fees overview",
            )
                .into_response()
        }
    }
}

/// Per-course fee breakdown for a student
pub async fn get_course_breakdown(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> impl IntoResponse {
    info!("GET /api/fees/breakdown - student: {}", query.student_id);

    let (enrollments, fees, payments) = tokio::join!(
        state.enrollment_repository.list_enrollments(&query.student_id),
        state.fee_repository.list_fees(&query.student_id),
        state.payment_repository.list_payments(&query.student_id),
    );

    match (enrollments, fees, payments) {
        (Ok(enrollments), Ok(fees), Ok(payments)) => {
            let ledger = PaymentLedger::build(&payments);
            let breakdowns = state.breakdown_service.build(&enrollments, &fees, &ledger);
            (StatusCode::OK, Json(breakdowns)).into_response()
        }
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            error!("Failed to compute course breakdown: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error computing course breakdown",
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CsvConnection, FeeStorage};
    use shared::Fee;

    async fn setup_test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let connection = CsvConnection::new(dir.path()).unwrap();
        (AppState::new(connection), dir)
    }

    fn fee(amount: f64) -> Fee {
        Fee {
            id: Fee::generate_id(),
            amount,
            due_date: "2026-03-01".to_string(),
            semester: "Semester 1".to_string(),
            academic_year: "2025/2026".to_string(),
            description: "Tuition".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_fees_handler() {
        let (state, _dir) = setup_test_state().await;
        state
            .fee_repository
            .store_fee("student-001", &fee(500_000.0))
            .await
            .unwrap();

        let query = StudentQuery {
            student_id: "student-001".to_string(),
        };
        let response = list_fees(State(state), Query(query)).await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_overview_handler_empty_student() {
        let (state, _dir) = setup_test_state().await;

        let query = StudentQuery {
            student_id: "student-nobody".to_string(),
        };
        let response = get_fees_overview(State(state), Query(query)).await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }
}
