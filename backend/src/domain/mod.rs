//! # Domain Module
//!
//! Contains all business logic for the student fee ledger.
//!
//! This module encapsulates the core business rules, entities, and services
//! that define how fees are owed, paid, and summarized. It operates
//! independently of any specific UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **ledger**: The completed-payment index everything else reads paid
//!   amounts through
//! - **fee_service**: Aggregate fee position and per-fee line derivation
//! - **breakdown_service**: Per-enrollment course fee summaries
//! - **payment_service**: Payment initiation against outstanding fees
//! - **portal_session**: One student's live snapshot and derived state
//!
//! ## Key Responsibilities
//!
//! - **Fee Aggregation**: Computing totals, outstanding balances, and
//!   payment progress from record snapshots
//! - **Payment Processing**: Selecting the fee to settle, stamping
//!   references, and persisting payment rows
//! - **Business Rule Enforcement**: Only completed payments count as paid;
//!   outstanding balances never go negative
//! - **Session State**: Loading record snapshots concurrently and keeping
//!   derived values consistent with them
//!
//! ## Core Concepts
//!
//! - **Fee**: A single amount owed for one semester line item
//! - **Payment**: A transaction against exactly one fee
//! - **Ledger Index**: Completed-payment totals keyed by fee
//! - **Breakdown**: The fee lines belonging to one enrolled course's semester
//!
//! ## Design Principles
//!
//! - **Pure Derivation**: Every derived value is a function of the snapshot;
//!   full recompute on change, no incremental caches to invalidate
//! - **Storage Agnostic**: Works with any storage implementation
//! - **UI Agnostic**: Notices go through an injected sink, identity through
//!   an explicit student context
//! - **Testability**: Pure functions and clear interfaces for easy testing

pub mod breakdown_service;
pub mod fee_service;
pub mod ledger;
pub mod models;
pub mod payment_service;
pub mod portal_session;

pub use breakdown_service::*;
pub use fee_service::*;
pub use ledger::*;
pub use payment_service::*;
pub use portal_session::*;
