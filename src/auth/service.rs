//! Authentication gate.
//!
//! Composes the credential store, the password hasher, and the token service
//! into the register / login / resolve operations. Every failure is terminal
//! for the request; there are no retries anywhere on this path.

use crate::auth::{
    jwt::TokenService,
    models::{RegisterRequest, User},
    password::{hash_password, verify_password},
    user_store::UserStore,
};
use crate::errors::ApiError;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Create a new account. The password is hashed before it ever touches
    /// the store and the returned record carries no password material for
    /// serialization.
    pub fn register(&self, request: RegisterRequest, password: &str) -> Result<User, ApiError> {
        if self.users.get(&request.username)?.is_some() {
            return Err(ApiError::Conflict);
        }

        let user = User {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            disabled: request.disabled.unwrap_or(false),
            is_admin: false,
            hashed_password: hash_password(password)?,
            created_at: Utc::now().to_rfc3339(),
        };

        self.users.insert(&user)?;
        info!(username = %user.username, "User registered");

        Ok(user)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown username and wrong password produce the identical error so the
    /// response never reveals which check failed.
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let user = match self.users.get(username)? {
            Some(user) if verify_password(password, &user.hashed_password) => user,
            _ => {
                warn!(username, "Failed login attempt");
                return Err(ApiError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(&user.username)?;
        info!(username = %user.username, "Login successful");
        Ok(token)
    }

    /// Resolve a bearer token to an active user.
    ///
    /// Signature, parse, and expiry failures collapse into one Unauthorized;
    /// they differ only in the log line. A valid token for a disabled account
    /// is the distinct second tier: authenticated but not allowed in.
    pub fn resolve(&self, token: &str) -> Result<User, ApiError> {
        let subject = self.tokens.validate(token).map_err(|err| {
            debug!("Token validation failed: {err:#}");
            ApiError::InvalidToken
        })?;

        let user = self
            .users
            .get(&subject)?
            .ok_or(ApiError::InvalidToken)?;

        if user.disabled {
            return Err(ApiError::Inactive);
        }

        Ok(user)
    }

    /// Gate for admin-only operations.
    pub fn require_admin(user: &User) -> Result<(), ApiError> {
        if !user.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }
}
