//! # IO Module
//!
//! Provides the interface layer between the portal frontend and the domain
//! logic.
//!
//! This module serves as the adapter layer that translates HTTP requests
//! into domain operations and formats domain responses for frontend
//! consumption. It handles the communication protocol (REST API),
//! serialization, and maintains the boundary between the presentation layer
//! and business logic.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: Exposing REST API endpoints for frontend consumption
//! - **Request/Response Handling**: Processing HTTP requests and formatting
//!   responses
//! - **Error Translation**: Converting domain errors to appropriate HTTP
//!   status codes
//! - **CORS Management**: Handling cross-origin requests for the web
//!   frontend

pub mod rest;
