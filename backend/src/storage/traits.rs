//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Enrollment, Fee, Payment};

/// Trait defining the interface for fee storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work with different storage backends
/// (hosted relational stores, CSV files, etc.) without modification.
#[async_trait]
pub trait FeeStorage: Send + Sync {
    /// Store a new fee line for a student
    async fn store_fee(&self, student_id: &str, fee: &Fee) -> Result<()>;

    /// List all fees for a student, ordered by due date descending
    async fn list_fees(&self, student_id: &str) -> Result<Vec<Fee>>;
}

/// Trait defining the interface for payment storage operations
#[async_trait]
pub trait PaymentStorage: Send + Sync {
    /// Store a new payment record for a student
    async fn store_payment(&self, student_id: &str, payment: &Payment) -> Result<()>;

    /// List all payments for a student, ordered by paid-at descending
    async fn list_payments(&self, student_id: &str) -> Result<Vec<Payment>>;
}

/// Trait defining the interface for enrollment storage operations
#[async_trait]
pub trait EnrollmentStorage: Send + Sync {
    /// Store a new enrollment (with its embedded course) for a student
    async fn store_enrollment(&self, student_id: &str, enrollment: &Enrollment) -> Result<()>;

    /// List all enrollments for a student, ordered by enrolled-at descending
    async fn list_enrollments(&self, student_id: &str) -> Result<Vec<Enrollment>>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories. This allows the domain layer
/// to work with any storage backend without knowing the implementation
/// details.
pub trait Connection: Send + Sync + Clone {
    /// The type of FeeStorage this connection creates
    type FeeRepository: FeeStorage + Clone;

    /// The type of PaymentStorage this connection creates
    type PaymentRepository: PaymentStorage + Clone;

    /// The type of EnrollmentStorage this connection creates
    type EnrollmentRepository: EnrollmentStorage + Clone;

    /// Create a new fee repository for this connection
    fn create_fee_repository(&self) -> Self::FeeRepository;

    /// Create a new payment repository for this connection
    fn create_payment_repository(&self) -> Self::PaymentRepository;

    /// Create a new enrollment repository for this connection
    fn create_enrollment_repository(&self) -> Self::EnrollmentRepository;
}
