//! HTTP surface: router assembly, shared state, and the public endpoints.

pub mod auth;
pub mod chat;
pub mod training;

use crate::auth::{auth_middleware, AuthService, UserStore};
use crate::middleware::{request_logging, security_headers, RateLimiter};
use crate::store::{CounterCache, DocumentStore};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub users: Arc<UserStore>,
    pub documents: Arc<DocumentStore>,
    pub cache: Arc<dyn CounterCache>,
}

/// Build the full application router with the middleware pipeline applied.
///
/// Layer order matters: logging starts the timer before rate limiting runs,
/// rate limiting short-circuits before any handler work, panics are contained
/// below that, and security headers decorate whatever comes back out.
pub fn app(state: AppState, limiter: RateLimiter) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/token", post(auth::token))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/admin/users", get(auth::list_users))
        .route("/api/chat/send", post(chat::send_message))
        .route("/api/chat/history", get(chat::get_history))
        .route("/api/training/data", post(training::add_data))
        .route("/api/training/upload", post(training::upload))
        .route("/api/training/train", post(training::train))
        .route("/api/training/status/:job_id", get(training::status))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(security_headers))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            limiter,
            crate::middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Panic containment: log the full detail, hand the caller an opaque 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Unhandled panic in request handler: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the Chatter API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    cache: String,
    response_time: String,
    version: String,
}

/// Always 200; the body reports whether the backing stores are reachable.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let start = Instant::now();

    let db_healthy = state.users.ping().is_ok() && state.documents.ping().is_ok();
    let cache_healthy = state.cache.ping();

    Json(HealthResponse {
        status: if db_healthy && cache_healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        database: if db_healthy {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        },
        cache: if cache_healthy {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        },
        response_time: format!("{:.4}s", start.elapsed().as_secs_f64()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
