//! Payment intent processing.
//!
//! Turns a "pay my fees" request into a concrete payment row: picks the fee
//! to settle, computes the amount due, stamps a transaction reference, and
//! persists the record through the payment store.

use crate::domain::ledger::PaymentLedger;
use crate::domain::models::payment_method::find_channel;
use crate::domain::models::student::StudentContext;
use crate::storage::{Connection, PaymentStorage};
use chrono::Utc;
use log::{error, info};
use rand::Rng;
use shared::{Fee, Payment, PaymentStatus};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by payment initiation.
///
/// `NoOutstandingBalance` and `NothingToPay` are user notices rather than
/// failures; [`PaymentError::is_informational`] lets callers pick the right
/// presentation.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),

    #[error("All fees are settled; there is nothing to pay")]
    NoOutstandingBalance,

    #[error("The selected fee has no outstanding amount")]
    NothingToPay,

    /// Carries the store's error message verbatim for the user.
    #[error("{0}")]
    PersistenceFailed(String),
}

impl PaymentError {
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            PaymentError::NoOutstandingBalance | PaymentError::NothingToPay
        )
    }
}

/// Service that records payments against outstanding fees.
#[derive(Clone)]
pub struct PaymentService<C: Connection> {
    payment_repository: C::PaymentRepository,
}

impl<C: Connection> PaymentService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            payment_repository: connection.create_payment_repository(),
        }
    }

    /// Record a payment for the next outstanding fee through the given
    /// channel.
    ///
    /// The target is the first fee in `fees` (store order, due date
    /// descending) with an unpaid remainder; the full remainder is paid in
    /// one transaction. Instant channels produce a completed payment, the
    /// rest start out pending until settlement confirms them.
    ///
    /// When the insert fails nothing has been written and no caller state
    /// should change; the store's message is passed through for the user.
    pub async fn initiate_payment(
        &self,
        student: &StudentContext,
        method_key: &str,
        fees: &[Fee],
        ledger: &PaymentLedger,
    ) -> Result<Payment, PaymentError> {
        let channel = find_channel(method_key)
            .ok_or_else(|| PaymentError::UnknownMethod(method_key.to_string()))?;

        let target = fees
            .iter()
            .find(|fee| (fee.amount - ledger.paid_for(&fee.id)).max(0.0) > 0.0)
            .ok_or(PaymentError::NoOutstandingBalance)?;

        // Guard kept even though target selection precludes it
        let amount = (target.amount - ledger.paid_for(&target.id)).max(0.0);
        if amount <= 0.0 {
            return Err(PaymentError::NothingToPay);
        }

        let payment = Payment {
            id: Payment::generate_id(),
            fee_id: target.id.clone(),
            amount,
            paid_at: Utc::now().to_rfc3339(),
            payment_method: channel.label.to_string(),
            status: if channel.instant {
                PaymentStatus::Completed
            } else {
                PaymentStatus::Pending
            },
            transaction_ref: generate_transaction_ref(method_key),
        };

        info!(
            "Recording payment of {:.2} against fee {} via {} ({})",
            amount, target.id, channel.label, payment.transaction_ref
        );

        self.payment_repository
            .store_payment(&student.student_id, &payment)
            .await
            .map_err(|e| {
                error!("Failed to persist payment {}: {}", payment.transaction_ref, e);
                PaymentError::PersistenceFailed(e.to_string())
            })?;

        Ok(payment)
    }
}

/// Build the user-facing confirmation for a recorded payment.
pub fn settlement_message(payment: &Payment) -> String {
    match payment.status {
        PaymentStatus::Completed => format!(
            "Payment of {:.0} received ({})",
            payment.amount, payment.transaction_ref
        ),
        _ => format!(
            "Payment of {:.0} is processing ({})",
            payment.amount, payment.transaction_ref
        ),
    }
}

/// Reference format: "PAY-<method>-<unix secs>-<nnn>". Readable on receipts
/// and bank statements; uniqueness is best-effort with no collision check.
fn generate_transaction_ref(method_key: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100..1000);
    format!("PAY-{}-{}-{}", method_key, Utc::now().timestamp(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvConnection;
    use shared::PaymentStatus;

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
            transaction_ref: "PAY-mobile-money-1770000000-321".to_string(),
        }
    }

    fn create_test_service() -> (PaymentService<CsvConnection>, Arc<CsvConnection>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let connection = Arc::new(CsvConnection::new(dir.path()).unwrap());
        (PaymentService::new(connection.clone()), connection, dir)
    }

    #[tokio::test]
    async fn test_selects_first_fee_with_outstanding_amount() {
        let (service, _conn, _dir) = create_test_service();
        let student = StudentContext::new("student-001");

        let fees = vec![fee("fee::a", 100.0), fee("fee::b", 50.0)];
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 100.0)]);

        let payment = service
            .initiate_payment(&student, "mobile-money", &fees, &ledger)
            .await
            .unwrap();
        assert_eq!(payment.fee_id, "fee::b");
        assert_eq!(payment.amount, 50.0);
    }

    #[tokio::test]
    async fn test_pays_remainder_of_partially_paid_fee() {
        let (service, _conn, _dir) = create_test_service();
        let student = StudentContext::new("student-001");

        let fees = vec![fee("fee::a", 500_000.0)];
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 200_000.0)]);

        let payment = service
            .initiate_payment(&student, "online-portal", &fees, &ledger)
            .await
            .unwrap();
        assert_eq!(payment.amount, 300_000.0);
    }

    #[tokio::test]
    async fn test_instant_channel_completes_immediately() {
        let (service, _conn, _dir) = create_test_service();
        let student = StudentContext::new("student-001");
        let fees = vec![fee("fee::a", 50.0)];

        let payment = service
            .initiate_payment(&student, "mobile-money", &fees, &PaymentLedger::default())
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_slow_channel_starts_pending() {
        let (service, _conn, _dir) = create_test_service();
        let student = StudentContext::new("student-001");
        let fees = vec![fee("fee::a", 50.0)];

        let payment = service
            .initiate_payment(&student, "bank-transfer", &fees, &PaymentLedger::default())
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.payment_method, "Bank Transfer");
    }

    #[tokio::test]
    async fn test_unknown_method_is_rejected() {
        let (service, _conn, _dir) = create_test_service();
        let student = StudentContext::new("student-001");
        let fees = vec![fee("fee::a", 50.0)];

        let err = service
            .initiate_payment(&student, "cash-under-door", &fees, &PaymentLedger::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::UnknownMethod(_)));
        assert!(!err.is_informational());
    }

    #[tokio::test]
    async fn test_settled_fees_mean_nothing_to_insert() {
        let (service, connection, _dir) = create_test_service();
        let student = StudentContext::new("student-001");

        let fees = vec![fee("fee::a", 100.0)];
        let ledger = PaymentLedger::build(&[completed_payment("fee::a", 100.0)]);

        let err = service
            .initiate_payment(&student, "mobile-money", &fees, &ledger)
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NoOutstandingBalance));
        assert!(err.is_informational());

        let repository = connection.create_payment_repository();
        let stored = repository.list_payments("student-001").await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_transaction_ref_format() {
        let (service, _conn, _dir) = create_test_service();
        let student = StudentContext::new("student-001");
        let fees = vec![fee("fee::a", 50.0)];

        let payment = service
            .initiate_payment(&student, "bank-branch", &fees, &PaymentLedger::default())
            .await
            .unwrap();

        let parts: Vec<&str> = payment.transaction_ref.split('-').collect();
        // "PAY-bank-branch-<secs>-<nnn>" - the method key itself contains a dash
        assert_eq!(parts[0], "PAY");
        assert!(payment.transaction_ref.starts_with("PAY-bank-branch-"));
        let suffix: u32 = parts.last().unwrap().parse().unwrap();
        assert!((100..=999).contains(&suffix));
    }

    #[test]
    fn test_settlement_message_wording() {
        let mut payment = completed_payment("fee::a", 300_000.0);
        assert!(settlement_message(&payment).contains("received"));

        payment.status = PaymentStatus::Pending;
        assert!(settlement_message(&payment).contains("processing"));
    }
}
