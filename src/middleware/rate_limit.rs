//! Rate limiting middleware.
//!
//! Fixed-window counting per client, backed by the counter cache. The
//! decision is the post-increment count from a single atomic cache operation;
//! there is no separate read. Limited requests short-circuit with 429 and a
//! `Retry-After` hint equal to the window length.

use crate::errors::ApiError;
use crate::store::cache::CounterCache;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Configuration for rate limiting.
#[derive(Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per key per window.
    pub max_requests: u32,
    /// Window duration; also the counter TTL in the cache.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    cache: Arc<dyn CounterCache>,
}

pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, cache: Arc<dyn CounterCache>) -> Self {
        Self { config, cache }
    }

    /// Increment-and-check for `key`. Atomic at the cache: concurrent calls
    /// for one key observe a linearizable counter.
    pub fn check(&self, key: &str) -> RateDecision {
        let count = self
            .cache
            .incr(&format!("rate_limit:{key}"), self.config.window);

        if count > u64::from(self.config.max_requests) {
            RateDecision::Limited {
                retry_after: self.config.window,
            }
        } else {
            RateDecision::Allowed {
                remaining: self.config.max_requests - count as u32,
            }
        }
    }

    pub fn cache_reachable(&self) -> bool {
        self.cache.ping()
    }
}

/// Per-request gate. Keyed by client network address; falls back to a shared
/// key when the connection info is unavailable (e.g. in-process tests).
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&key) {
        RateDecision::Allowed { .. } => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            warn!(client = %key, "Rate limit exceeded");
            ApiError::RateLimited { retry_after }.into_response()
        }
    }
}
