//! CSV-backed storage.
//!
//! One directory per student under a base data directory, holding
//! `fees.csv`, `payments.csv`, and `enrollments.csv`. Files are rewritten
//! atomically (temp file + rename) so a crash mid-write never corrupts a
//! ledger.

pub mod connection;
pub mod enrollment_repository;
pub mod fee_repository;
pub mod payment_repository;

pub use connection::CsvConnection;
pub use enrollment_repository::EnrollmentRepository;
pub use fee_repository::FeeRepository;
pub use payment_repository::PaymentRepository;
