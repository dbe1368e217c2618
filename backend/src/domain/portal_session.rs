//! Portal session state for one signed-in student.
//!
//! A session owns the student's record snapshot (fees, payments,
//! enrollments) and every value derived from it. The three record sets are
//! fetched concurrently and installed only once all three reads have
//! resolved, so consumers never see aggregates computed from a half-loaded
//! snapshot. Derived values are rebuilt in full after every change; nothing
//! is incrementally maintained.
//!
//! User-visible outcomes (payment confirmations, degraded reads, payment
//! errors) are routed through an injected [`NotificationSink`] rather than
//! any ambient message channel.

use crate::domain::breakdown_service::BreakdownService;
use crate::domain::fee_service::FeeService;
use crate::domain::ledger::PaymentLedger;
use crate::domain::models::student::StudentContext;
use crate::domain::payment_service::{settlement_message, PaymentError, PaymentService};
use crate::storage::{Connection, EnrollmentStorage, FeeStorage, PaymentStorage};
use log::{error, info};
use shared::{CourseFeesBreakdown, Enrollment, Fee, FeesOverview, Payment};
use std::sync::Arc;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user, routed through the session's notification sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Where user-facing notices go. The portal UI supplies its own sink.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sink that writes notices to the log. Used when no UI is attached.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!("{}", notice.message),
            NoticeLevel::Error => error!("{}", notice.message),
        }
    }
}

/// A fetched record snapshot, tagged with the session generation it was
/// requested under. A `None` slice means that read failed and the previous
/// data should be kept.
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    fees: Option<Vec<Fee>>,
    payments: Option<Vec<Payment>>,
    enrollments: Option<Vec<Enrollment>>,
}

/// One student's live view of their fee ledger.
pub struct PortalSession<C: Connection> {
    student: StudentContext,
    fee_repository: C::FeeRepository,
    payment_repository: C::PaymentRepository,
    enrollment_repository: C::EnrollmentRepository,
    payment_service: PaymentService<C>,
    fee_service: FeeService,
    breakdown_service: BreakdownService,
    sink: Arc<dyn NotificationSink>,
    generation: u64,
    fees: Vec<Fee>,
    payments: Vec<Payment>,
    enrollments: Vec<Enrollment>,
    ledger: PaymentLedger,
    overview: FeesOverview,
    breakdowns: Vec<CourseFeesBreakdown>,
}

impl<C: Connection> PortalSession<C> {
    /// Create an empty session; call [`PortalSession::refresh`] to load data.
    pub fn new(
        connection: Arc<C>,
        student: StudentContext,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let fee_service = FeeService::new();
        let overview = fee_service.overview(&[], &PaymentLedger::default());

        Self {
            student,
            fee_repository: connection.create_fee_repository(),
            payment_repository: connection.create_payment_repository(),
            enrollment_repository: connection.create_enrollment_repository(),
            payment_service: PaymentService::new(connection),
            fee_service,
            breakdown_service: BreakdownService::new(),
            sink,
            generation: 0,
            fees: Vec::new(),
            payments: Vec::new(),
            enrollments: Vec::new(),
            ledger: PaymentLedger::default(),
            overview,
            breakdowns: Vec::new(),
        }
    }

    pub fn student(&self) -> &StudentContext {
        &self.student
    }

    pub fn fees(&self) -> &[Fee] {
        &self.fees
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub fn overview(&self) -> &FeesOverview {
        &self.overview
    }

    pub fn breakdowns(&self) -> &[CourseFeesBreakdown] {
        &self.breakdowns
    }

    /// Fetch all three record sets concurrently.
    ///
    /// Derived values are not touched here; [`PortalSession::apply_snapshot`]
    /// installs the result once the wait-all join has resolved. A failed read
    /// degrades its slice to "keep what we had" and tells the user.
    pub async fn load_snapshot(&self) -> Snapshot {
        let student_id = &self.student.student_id;
        let (fees, payments, enrollments) = tokio::join!(
            self.fee_repository.list_fees(student_id),
            self.payment_repository.list_payments(student_id),
            self.enrollment_repository.list_enrollments(student_id),
        );

        Snapshot {
            generation: self.generation,
            fees: self.loaded_slice("fees", fees),
            payments: self.loaded_slice("payments", payments),
            enrollments: self.loaded_slice("enrollments", enrollments),
        }
    }

    fn loaded_slice<T>(&self, what: &str, result: anyhow::Result<Vec<T>>) -> Option<Vec<T>> {
        match result {
            Ok(rows) => Some(rows),
            Err(e) => {
                error!(
                    "Failed to load {} for {}: {}",
                    what, self.student.student_id, e
                );
                self.sink.notify(Notice::error(format!(
                    "Could not load your {}; showing the last known data",
                    what
                )));
                None
            }
        }
    }

    /// Install a fetched snapshot and recompute every derived value.
    ///
    /// A snapshot requested before the most recent [`PortalSession::invalidate`]
    /// is discarded, so reads still in flight when a view goes away can never
    /// overwrite newer state. Returns whether the snapshot was applied.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        if snapshot.generation != self.generation {
            info!(
                "Discarding stale snapshot for {} (generation {}, now {})",
                self.student.student_id, snapshot.generation, self.generation
            );
            return false;
        }

        if let Some(fees) = snapshot.fees {
            self.fees = fees;
        }
        if let Some(payments) = snapshot.payments {
            self.payments = payments;
        }
        if let Some(enrollments) = snapshot.enrollments {
            self.enrollments = enrollments;
        }

        self.recompute();
        true
    }

    /// Fetch and install in one step.
    pub async fn refresh(&mut self) -> bool {
        let snapshot = self.load_snapshot().await;
        self.apply_snapshot(snapshot)
    }

    /// Invalidate any snapshot still in flight. Called when the consuming
    /// view is torn down so its reads land in the void.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Pay the next outstanding fee through the given channel.
    ///
    /// On success the new payment joins the local snapshot and everything
    /// derived from it is recomputed. On failure local state is left exactly
    /// as it was.
    pub async fn pay(&mut self, method_key: &str) -> Result<Payment, PaymentError> {
        let result = self
            .payment_service
            .initiate_payment(&self.student, method_key, &self.fees, &self.ledger)
            .await;

        match result {
            Ok(payment) => {
                self.payments.insert(0, payment.clone());
                self.recompute();
                self.sink.notify(Notice::info(settlement_message(&payment)));
                Ok(payment)
            }
            Err(e) => {
                let notice = if e.is_informational() {
                    Notice::info(e.to_string())
                } else {
                    Notice::error(e.to_string())
                };
                self.sink.notify(notice);
                Err(e)
            }
        }
    }

    /// Rebuild the ledger index and everything downstream of it.
    fn recompute(&mut self) {
        self.ledger = PaymentLedger::build(&self.payments);
        self.overview = self.fee_service.overview(&self.fees, &self.ledger);
        self.breakdowns = self
            .breakdown_service
            .build(&self.enrollments, &self.fees, &self.ledger);
    }
}
