//! Middleware components for HTTP request processing.
//!
//! Cross-cutting concerns that sit in front of the catalog handlers: response
//! hardening headers, per-endpoint rate limiting and client identification.

pub mod ip;
pub mod rate_limit;
pub mod security_headers;

pub use rate_limit::EndpointRateLimiter;
