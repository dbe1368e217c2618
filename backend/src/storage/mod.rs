//! # Storage Module
//!
//! Handles all data persistence operations for the fee ledger.
//!
//! This module abstracts away the specific storage implementation details and
//! provides a consistent interface for persisting and retrieving student
//! records. The implementation can be swapped out (hosted relational store,
//! flat files, etc.) without affecting the domain logic or IO layers.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Saving fees, payments, and enrollments to disk
//! - **Data Retrieval**: Loading stored records back into memory in the
//!   orderings the domain layer expects
//! - **Storage Abstraction**: Providing a consistent API regardless of backend
//! - **Transaction Safety**: Atomic file rewrites so a crash never leaves a
//!   half-written ledger
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: CSV files, one directory per student
//! - **Testability**: Repositories constructed from a `Connection` factory so
//!   tests can point them at a temp directory

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{Connection, EnrollmentStorage, FeeStorage, PaymentStorage};
