//! API error taxonomy.
//!
//! Every handler and service failure funnels into [`ApiError`], which maps to
//! an HTTP status and a client-safe message. Internal faults are logged with
//! full detail server-side and never leak their text to the caller.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::time::Duration;

#[derive(Debug)]
pub enum ApiError {
    /// Duplicate registration.
    Conflict,
    /// Bad username/password at login. Deliberately identical for unknown
    /// user and wrong password.
    InvalidCredentials,
    /// Missing, malformed, expired, or wrong-secret bearer token, or a token
    /// whose subject no longer exists.
    InvalidToken,
    /// Valid token for a disabled account.
    Inactive,
    /// Authenticated but lacking the required privilege.
    Forbidden,
    /// Fixed-window limit exceeded.
    RateLimited { retry_after: Duration },
    NotFound(String),
    BadRequest(&'static str),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match &self {
            ApiError::Conflict => (
                StatusCode::BAD_REQUEST,
                "Username already registered".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Incorrect username or password".to_string(),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Could not validate credentials".to_string(),
            ),
            ApiError::Inactive => (StatusCode::BAD_REQUEST, "Inactive user".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Not enough permissions".to_string()),
            ApiError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "Too many requests".to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, (*msg).to_string()),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();

        match &self {
            ApiError::InvalidCredentials | ApiError::InvalidToken => {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            }
            ApiError::RateLimited { retry_after } => {
                if let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
            }
            _ => {}
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Conflict.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Inactive.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("missing".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response = ApiError::InvalidToken.into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let response = ApiError::RateLimited {
            retry_after: Duration::from_secs(60),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }

    #[test]
    fn test_internal_error_is_opaque() {
        let response =
            ApiError::Internal(anyhow::anyhow!("secret database detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
