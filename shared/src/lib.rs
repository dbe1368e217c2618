use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A fee line owed by one student for one semester.
///
/// Fees are immutable once raised; settling one happens through payments,
/// never by editing the amount in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    /// Fee ID in format: "fee::<uuid>"
    pub id: String,
    /// Amount owed in currency units. Never negative.
    pub amount: f64,
    /// Due date as a calendar date (YYYY-MM-DD)
    pub due_date: String,
    /// Semester label, e.g. "Semester 1"
    pub semester: String,
    /// Academic year label, e.g. "2025/2026"
    pub academic_year: String,
    /// Human-readable description, e.g. "Tuition"
    pub description: String,
}

impl Fee {
    /// Generate a fee ID
    pub fn generate_id() -> String {
        format!("fee::{}", Uuid::new_v4())
    }

    /// Whether this fee's due date has passed relative to the given date.
    /// An unparseable due date is never considered overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d")
            .map(|due| due < today)
            .unwrap_or(false)
    }
}

/// Settlement state of a payment.
///
/// Only `Completed` payments count toward paid totals. `Failed` payments are
/// recorded by external settlement processes and are only ever read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction record against exactly one fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID in format: "payment::<uuid>"
    pub id: String,
    /// ID of the fee this payment settles
    pub fee_id: String,
    /// Amount paid in currency units. Never negative.
    pub amount: f64,
    /// Timestamp the payment was made (RFC 3339)
    pub paid_at: String,
    /// Channel label, e.g. "Mobile Money"
    pub payment_method: String,
    pub status: PaymentStatus,
    /// Human-readable reference in format "PAY-<method>-<unix secs>-<nnn>".
    /// Best-effort unique; uniqueness is not enforced.
    pub transaction_ref: String,
}

impl Payment {
    /// Generate a payment ID
    pub fn generate_id() -> String {
        format!("payment::{}", Uuid::new_v4())
    }
}

/// A course a student can enroll in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    /// Course code, e.g. "CSC 101"
    pub code: String,
    pub credits: u32,
    /// Semester label the course runs in, e.g. "Semester 1"
    pub semester: String,
    /// Calendar year the course runs in
    pub year: u32,
}

/// Links a student to a course, with the course embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrollment ID in format: "enrollment::<uuid>"
    pub id: String,
    pub course_id: String,
    /// Enrollment state label, e.g. "active"
    pub status: String,
    /// Timestamp the student enrolled (RFC 3339)
    pub enrolled_at: String,
    pub course: Course,
}

impl Enrollment {
    /// Generate an enrollment ID
    pub fn generate_id() -> String {
        format!("enrollment::{}", Uuid::new_v4())
    }
}

/// A fee together with its derived per-line payment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLine {
    pub fee: Fee,
    /// Total of completed payments against this fee
    pub amount_paid: f64,
    /// Remaining amount, floored at zero
    pub outstanding: f64,
    /// Percentage paid, clamped to 0-100 even when overpaid
    pub progress: f64,
    pub is_paid: bool,
    pub is_partial: bool,
}

/// Aggregate fee position for one student, plus the per-fee lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeesOverview {
    pub total_fees: f64,
    pub total_paid: f64,
    /// max(total_fees - total_paid, 0); never negative even on overpayment
    pub outstanding: f64,
    /// Percentage paid. Zero when no fees exist; may exceed 100 on overpayment.
    pub payment_progress: f64,
    /// Fee lines in store order (due date descending)
    pub fees: Vec<FeeLine>,
}

/// Per-enrollment fee summary: the fee lines for the course's semester and
/// their totals. Fees are matched to the course by semester label, so two
/// courses in the same semester show the same fee lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseFeesBreakdown {
    pub enrollment_id: String,
    pub course: Course,
    pub semester_fees: Vec<FeeLine>,
    pub total_cost: f64,
    pub total_paid: f64,
    pub remaining: f64,
    /// True once remaining <= 0
    pub is_settled: bool,
}

/// A payment channel offered to students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Stable key, e.g. "mobile-money"
    pub key: String,
    /// Display label, e.g. "Mobile Money"
    pub label: String,
    /// Whether the channel settles immediately
    pub instant: bool,
}

/// Request to pay the next outstanding fee through a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentRequest {
    /// Payment channel key, e.g. "mobile-money"
    pub method: String,
}

/// Response after a payment was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentResponse {
    pub payment: Payment,
    pub success_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let parsed: PaymentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Pending);
    }

    #[test]
    fn test_generated_ids_carry_entity_prefix() {
        assert!(Fee::generate_id().starts_with("fee::"));
        assert!(Payment::generate_id().starts_with("payment::"));
        assert!(Enrollment::generate_id().starts_with("enrollment::"));
    }

    #[test]
    fn test_fee_overdue() {
        let fee = Fee {
            id: Fee::generate_id(),
            amount: 500_000.0,
            due_date: "2026-01-15".to_string(),
            semester: "Semester 1".to_string(),
            academic_year: "2025/2026".to_string(),
            description: "Tuition".to_string(),
        };

        let before = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(!fee.is_overdue(before));
        assert!(fee.is_overdue(after));
    }

    #[test]
    fn test_fee_overdue_unparseable_date() {
        let fee = Fee {
            id: Fee::generate_id(),
            amount: 0.0,
            due_date: "soon".to_string(),
            semester: "Semester 1".to_string(),
            academic_year: "2025/2026".to_string(),
            description: "Tuition".to_string(),
        };
        assert!(!fee.is_overdue(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
    }
}
