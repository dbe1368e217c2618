//! Course fee breakdown domain logic.
//!
//! Builds the per-enrollment summaries the portal's courses view renders:
//! which fee lines belong to each enrolled course's semester, how much of
//! them is paid, and whether the course is settled.

use crate::domain::fee_service::FeeService;
use crate::domain::ledger::PaymentLedger;
use shared::{CourseFeesBreakdown, Enrollment, Fee};

/// Builds per-enrollment fee summaries from a record snapshot.
#[derive(Clone)]
pub struct BreakdownService {
    fee_service: FeeService,
}

impl BreakdownService {
    pub fn new() -> Self {
        Self {
            fee_service: FeeService::new(),
        }
    }

    /// Produce one breakdown per enrollment.
    ///
    /// Fees are matched to the enrollment's course by semester label equality
    /// alone; the fee snapshot is expected to already be scoped to the
    /// student. Two courses sharing a semester label therefore show the same
    /// fee lines. Fee lines are raised per semester rather than per course,
    /// so no fee-to-course reference exists to join on. Whether that sharing
    /// is intentional or a modeling gap is unresolved; the label match is
    /// kept as-is.
    ///
    /// This is a full rederivation from the inputs; call it again whenever
    /// the fee, enrollment, or ledger snapshot changes.
    pub fn build(
        &self,
        enrollments: &[Enrollment],
        fees: &[Fee],
        ledger: &PaymentLedger,
    ) -> Vec<CourseFeesBreakdown> {
        enrollments
            .iter()
            .map(|enrollment| {
                let semester_fees: Vec<_> = fees
                    .iter()
                    .filter(|fee| fee.semester == enrollment.course.semester)
                    .map(|fee| self.fee_service.fee_line(fee, ledger))
                    .collect();

                let total_cost: f64 = semester_fees.iter().map(|line| line.fee.amount).sum();
                let total_paid: f64 = semester_fees.iter().map(|line| line.amount_paid).sum();
                let remaining = total_cost - total_paid;

                CourseFeesBreakdown {
                    enrollment_id: enrollment.id.clone(),
                    course: enrollment.course.clone(),
                    semester_fees,
                    total_cost,
                    total_paid,
                    remaining,
                    is_settled: remaining <= 0.0,
                }
            })
            .collect()
    }
}

impl Default for BreakdownService {
    fn default() -> Self {
        Self::new()
    }
}
