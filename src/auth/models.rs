//! Authentication data structures.

use serde::{Deserialize, Serialize};

/// User account as held by the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub disabled: bool,
    pub is_admin: bool,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created_at: String,
}

/// JWT claims payload. `sub` is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Registration request body. Password travels as a separate parameter and
/// never appears in the stored document.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub disabled: Option<bool>,
}

/// Login form body (`application/x-www-form-urlencoded`).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token issuance response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// User response with credential material stripped.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub disabled: bool,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            disabled: user.disabled,
        }
    }
}

/// Resolved request identity, inserted into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
            disabled: false,
            is_admin: false,
            hashed_password: "bcrypt-digest".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("bcrypt-digest"));
        assert!(!json.contains("hashed_password"));
    }

    #[test]
    fn test_user_response_strips_credentials() {
        let user = User {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: Some("Alice".to_string()),
            disabled: false,
            is_admin: true,
            hashed_password: "digest".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let response = UserResponse::from_user(&user);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("digest"));
    }
}
