//! Authentication endpoints.

use crate::api::AppState;
use crate::auth::models::{
    CurrentUser, LoginForm, RegisterRequest, TokenResponse, UserResponse,
};
use crate::auth::AuthService;
use crate::errors::ApiError;
use axum::{
    extract::{Query, State},
    response::Json,
    Extension, Form,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    pub password: String,
}

/// POST /api/auth/register
///
/// Body carries the user record, the password rides as a query parameter and
/// is hashed before anything is persisted. 400 on a duplicate username.
pub async fn register(
    State(state): State<AppState>,
    Query(params): Query<RegisterParams>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth.register(request, &params.password)?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// POST /api/auth/token
///
/// Form-encoded credentials in, bearer token out. Unknown username and wrong
/// password are the same 401.
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let access_token = state.auth.login(&form.username, &form.password)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /api/auth/me — identity resolved by the auth middleware.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from_user(&user))
}

/// GET /api/admin/users — admin only.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    AuthService::require_admin(&user)?;

    let users = state.users.list()?;
    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}
