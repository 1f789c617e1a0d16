//! Authentication: credential storage, password hashing, bearer tokens, and
//! the gate that composes them.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use jwt::TokenService;
pub use middleware::auth_middleware;
pub use models::{CurrentUser, User};
pub use service::AuthService;
pub use user_store::UserStore;
