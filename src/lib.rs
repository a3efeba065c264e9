//! # romshelf
//!
//! A small HTTP backend that lists the ROM files in a local directory and
//! streams them to browser-based emulators.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server and routing
//! - **Tokio**: async runtime; directory scans run on the blocking pool
//! - **tower-http**: CORS, tracing and compression layers
//! - **Serde**: JSON bodies and configuration
//!
//! ## Core Components
//!
//! - [`catalog`]: directory scan, filtering, pagination and whitelisted file access
//! - [`config`]: layered configuration (embedded defaults, file, environment)
//! - [`error`]: HTTP error type rendering `{"detail": ...}` bodies
//! - [`metrics`]: request counters
//! - [`middleware`]: security headers, rate limiting, client IP extraction
//! - [`routes`]: endpoint handlers and the router
//! - [`state`]: shared application state
//! - [`types`]: request/response types
//!
//! The catalog is never cached. Every request sees the directory as it is.

pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;
