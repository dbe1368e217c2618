//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the fee ledger.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Error translation from domain to HTTP status codes
//! - Request logging
//!
//! ## Design Principles
//!
//! - **REST Compliance**: Following RESTful design patterns
//! - **Error Transparency**: Clear error messages for debugging
//! - **Domain Separation**: Pure translation layer without business logic

pub mod enrollment_apis;
pub mod fee_apis;
pub mod payment_apis;
