//! # REST API for Enrollments
//!
//! Endpoint for listing a student's course enrollments.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::storage::EnrollmentStorage;
use crate::AppState;

/// Query parameters identifying the student whose records to read
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: String,
}

/// List a student's enrollments with their embedded courses, newest first
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> impl IntoResponse {
    info!("GET /api/enrollments - student: {}", query.student_id);

    match state
        .enrollment_repository
        .list_enrollments(&query.student_id)
        .await
    {
        Ok(enrollments) => (StatusCode::OK, Json(enrollments)).into_response(),
        Err(e) => {
            error!("Failed to list enrollments: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error listing enrollments",
            )
                .into_response()
        }
    }
}
