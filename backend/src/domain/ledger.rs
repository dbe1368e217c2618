//! Payment ledger index.
//!
//! The index maps each fee to the total of completed payments recorded
//! against it. Everything downstream (the aggregate position, the per-course
//! breakdowns, payment targeting) reads paid amounts through this index
//! rather than re-scanning the payment list.

use shared::{Payment, PaymentStatus};
use std::collections::HashMap;

/// Completed-payment totals keyed by fee ID.
///
/// A fee absent from the index has simply received no completed payments;
/// consumers get zero back, never a lookup failure. Summation is commutative,
/// so the index does not depend on the order payments arrive in.
#[derive(Debug, Clone, Default)]
pub struct PaymentLedger {
    totals: HashMap<String, f64>,
}

impl PaymentLedger {
    /// Build the index from a payment snapshot.
    ///
    /// Only completed payments contribute; pending ones have not settled yet
    /// and failed ones never will.
    pub fn build(payments: &[Payment]) -> Self {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for payment in payments {
            if payment.status == PaymentStatus::Completed {
                *totals.entry(payment.fee_id.clone()).or_insert(0.0) += payment.amount;
            }
        }
        Self { totals }
    }

    /// Total completed payments recorded against a fee. Zero when none exist.
    pub fn paid_for(&self, fee_id: &str) -> f64 {
        self.totals.get(fee_id).copied().unwrap_or(0.0)
    }

    /// Sum of all completed payments in the index.
    pub fn total_paid(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Number of fees with at least one completed payment.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
