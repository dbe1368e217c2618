//! Fee aggregation domain logic.
//!
//! Derives the figures the portal's fees view renders: the aggregate
//! position (total owed, total paid, outstanding balance, overall progress)
//! and the per-fee line state. Everything here is a pure function of the fee
//! snapshot and the payment ledger index; derived values are recomputed from
//! scratch whenever either input changes.

use crate::domain::ledger::PaymentLedger;
use shared::{Fee, FeeLine, FeesOverview};

/// Service deriving the aggregate fee position and per-fee line state.
#[derive(Clone)]
pub struct FeeService;

impl FeeService {
    pub fn new() -> Self {
        Self
    }

    /// Derive the per-line state for one fee.
    ///
    /// Line progress is clamped to 100 so an overpaid fee still renders a
    /// full bar; the aggregate figure in [`FeeService::overview`] is the one
    /// allowed to exceed 100.
    pub fn fee_line(&self, fee: &Fee, ledger: &PaymentLedger) -> FeeLine {
        let amount_paid = ledger.paid_for(&fee.id);
        let outstanding = (fee.amount - amount_paid).max(0.0);
        let progress = if fee.amount > 0.0 {
            ((amount_paid / fee.amount) * 100.0).min(100.0)
        } else {
            0.0
        };

        FeeLine {
            fee: fee.clone(),
            amount_paid,
            outstanding,
            progress,
            is_paid: amount_paid >= fee.amount,
            is_partial: amount_paid > 0.0 && amount_paid < fee.amount,
        }
    }

    /// Derive the aggregate position over a fee snapshot.
    ///
    /// `outstanding` is floored at zero even when overpayment pushes the paid
    /// total past the owed total. `payment_progress` guards the zero-fee case
    /// and is not clamped above 100.
    pub fn overview(&self, fees: &[Fee], ledger: &PaymentLedger) -> FeesOverview {
        let total_fees: f64 = fees.iter().map(|fee| fee.amount).sum();
        let total_paid = ledger.total_paid();
        let outstanding = (total_fees - total_paid).max(0.0);
        let payment_progress = if total_fees > 0.0 {
            (total_paid / total_fees) * 100.0
        } else {
            0.0
        };

        FeesOverview {
            total_fees,
            total_paid,
            outstanding,
            payment_progress,
            fees: fees.iter().map(|fee| self.fee_line(fee, ledger)).collect(),
        }
    }
}

impl Default for FeeService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Payment, PaymentStatus};

    fn fee(id: &str, amount: f64) -> Fee {
        Fee {
            id: id.to_string(),
            amount,
            due_date: "2026-03-01".to_string(),
            semester: "Semester 1".to_string(),
            academic_year: "2025/2026".to_string(),
            description: "Tuition".to_string(),
        }
    }

    fn completed_payment(fee_id: &str, amount: f64) -> Payment {
        Payment {
            id: Payment::generate_id(),
            fee_id: fee_id.to_string(),
            amount,
            paid_at: "2026-02-01T10:00:00+03:00".to_string(),
            payment_method: "Mobile Money".to_string(),
            status: PaymentStatus::Completed,
            transaction_ref: "PAY-mobile-money-1770000000-456".to_string(),
        }
    }

    #[test]
    fn test_overview_basic_aggregates() {
        let service = FeeService::new();
        let fees = vec![fee("fee::a", 500_000.0), fee("fee::b", 150_000.0)];
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 200_000.0)]);

        let overview = service.overview(&fees, &ledger);
        assert_eq!(overview.total_fees, 650_000.0);
        assert_eq!(overview.total_paid, 200_000.0);
        assert_eq!(overview.outstanding, 450_000.0);
        assert!((overview.payment_progress - 200_000.0 / 650_000.0 * 100.0).abs() < 1e-9);
        assert_eq!(overview.fees.len(), 2);
    }

    #[test]
    fn test_outstanding_never_negative_on_overpayment() {
        let service = FeeService::new();
        let fees = vec![fee("fee::a", 100.0)];
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 250.0)]);

        let overview = service.overview(&fees, &ledger);
        assert_eq!(overview.outstanding, 0.0);
        // The aggregate figure is allowed past 100
        assert_eq!(overview.payment_progress, 250.0);
    }

    #[test]
    fn test_progress_zero_when_no_fees() {
        let service = FeeService::new();
        let overview = service.overview(&[], &PaymentLedger::default());

        assert_eq!(overview.total_fees, 0.0);
        assert_eq!(overview.payment_progress, 0.0);
        assert!(overview.payment_progress.is_finite());
        assert!(overview.fees.is_empty());
    }

    #[test]
    fn test_fee_line_progress_clamped_at_100() {
        let service = FeeService::new();
        let overpaid = fee("fee::a", 100.0);
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 250.0)]);

        let line = service.fee_line(&overpaid, &ledger);
        assert_eq!(line.progress, 100.0);
        assert_eq!(line.outstanding, 0.0);
        assert!(line.is_paid);
        assert!(!line.is_partial);
    }

    #[test]
    fn test_fee_line_partial_payment() {
        let service = FeeService::new();
        let target = fee("fee::a", 200.0);
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 50.0)]);

        let line = service.fee_line(&target, &ledger);
        assert_eq!(line.amount_paid, 50.0);
        assert_eq!(line.outstanding, 150.0);
        assert_eq!(line.progress, 25.0);
        assert!(!line.is_paid);
        assert!(line.is_partial);
    }

    #[test]
    fn test_fee_line_unpaid_and_zero_amount() {
        let service = FeeService::new();
        let ledger = PaymentLedger::default();

        let unpaid = service.fee_line(&fee("fee::a", 300.0), &ledger);
        assert_eq!(unpaid.progress, 0.0);
        assert!(!unpaid.is_paid);
        assert!(!unpaid.is_partial);

        // A zero-amount fee needs nothing to be considered settled
        let zero = service.fee_line(&fee("fee::b", 0.0), &ledger);
        assert_eq!(zero.progress, 0.0);
        assert!(zero.is_paid);
        assert!(!zero.is_partial);
    }
}
