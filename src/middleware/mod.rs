//! Request pipeline middleware.
//!
//! Ordered outermost-in: request logging, rate limiting, panic containment
//! (via tower-http's catch-panic layer, wired in the router), then security
//! headers around the handler.

pub mod logging;
pub mod rate_limit;
pub mod security;

pub use logging::request_logging;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use security::security_headers;
