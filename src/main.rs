//! Chatter - chat logging and training ingestion backend.
//!
//! Wires configuration, stores, the authentication gate, and the middleware
//! pipeline into an axum server.

use anyhow::{Context, Result};
use chatter_backend::{
    api::{app, AppState},
    auth::{AuthService, TokenService, UserStore},
    config::{load_env, Settings},
    middleware::{RateLimitConfig, RateLimiter},
    store::{DocumentStore, MemoryCache},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let settings = Settings::from_env();
    info!("Starting Chatter backend");

    let users = Arc::new(UserStore::new(&settings.auth_db_path)?);
    let documents = Arc::new(DocumentStore::new(&settings.data_db_path)?);
    info!(
        auth_db = %settings.auth_db_path,
        data_db = %settings.data_db_path,
        "Stores initialized"
    );

    let tokens = Arc::new(TokenService::new(
        settings.secret_key.clone(),
        settings.access_token_expire_minutes,
    ));
    let auth = AuthService::new(users.clone(), tokens);

    let cache = Arc::new(MemoryCache::new());
    let limiter = RateLimiter::new(
        RateLimitConfig {
            max_requests: settings.rate_limit,
            window: settings.rate_window,
        },
        cache.clone(),
    );

    // Sweep expired rate windows so idle keys don't accumulate.
    {
        let cache = cache.clone();
        let interval = settings.rate_window.max(Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval * 2);
            loop {
                ticker.tick().await;
                cache.cleanup();
            }
        });
    }

    let state = AppState {
        auth,
        users,
        documents,
        cache,
    };

    let router = app(state, limiter);

    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    info!("API server listening on {}", settings.bind_addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatter_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
