//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code, and latency, and
//! attaches the elapsed time to the response as `X-Process-Time`. The timer
//! starts before rate limiting runs, so rejected requests are still timed.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let start = Instant::now();
    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    if let Ok(value) = HeaderValue::from_str(&format!("{:.4}s", latency.as_secs_f64())) {
        response.headers_mut().insert("x-process-time", value);
    }

    if status >= 500 {
        warn!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency.as_millis() as u64,
            "Request failed (5xx)"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status,
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
    }

    response
}
