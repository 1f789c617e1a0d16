//! Runtime settings loaded from the environment.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    /// HS256 signing secret for bearer tokens.
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    /// Maximum requests per client per window.
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub auth_db_path: String,
    pub data_db_path: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let secret_key = env::var("SECRET_KEY")
            .or_else(|_| env::var("JWT_SECRET"))
            .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());

        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(30);

        let rate_limit = env::var("RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(100);

        let rate_window_secs = env::var("RATE_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(60);

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            secret_key,
            access_token_expire_minutes,
            rate_limit,
            rate_window: Duration::from_secs(rate_window_secs),
            auth_db_path: resolve_data_path(env::var("AUTH_DB_PATH").ok(), "chatter_auth.db"),
            data_db_path: resolve_data_path(env::var("DATA_DB_PATH").ok(), "chatter_data.db"),
        }
    }
}

/// Resolve a database path, treating relative paths as relative to the crate
/// directory rather than the caller's cwd.
fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) else {
        return base.join(default_filename).to_string_lossy().to_string();
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }
    base.join(p).to_string_lossy().to_string()
}

pub fn load_env() {
    // Standard dotenv search (cwd + parents), plus the crate directory for
    // runs started with --manifest-path from elsewhere.
    let _ = dotenv::dotenv();

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_env();
        assert!(settings.access_token_expire_minutes > 0);
        assert!(settings.rate_limit > 0);
        assert!(settings.rate_window >= Duration::from_secs(1));
        assert!(!settings.secret_key.is_empty());
    }

    #[test]
    fn test_resolve_data_path_absolute_passthrough() {
        let resolved = resolve_data_path(Some("/tmp/test.db".to_string()), "default.db");
        assert_eq!(resolved, "/tmp/test.db");
    }

    #[test]
    fn test_resolve_data_path_empty_falls_back() {
        let resolved = resolve_data_path(Some("  ".to_string()), "default.db");
        assert!(resolved.ends_with("default.db"));
    }
}
