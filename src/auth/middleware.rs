//! Route protection.
//!
//! Extracts the bearer token from the `Authorization` header, resolves it to
//! an active user through the auth service, and stashes the identity in the
//! request extensions for handlers downstream.

use crate::auth::models::CurrentUser;
use crate::auth::service::AuthService;
use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

pub async fn auth_middleware(
    State(auth): State<AuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(ApiError::InvalidToken)?;

    let user = auth.resolve(&token)?;
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
