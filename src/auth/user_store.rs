//! Credential store.
//!
//! Persists user records (username, hashed password, flags) in SQLite.
//! Username uniqueness is enforced by the schema; rows are validated into
//! typed [`User`] values at this boundary, never duck-typed through.

use crate::auth::models::User;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

pub struct UserStore {
    db_path: String,
}

impl UserStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                full_name TEXT,
                disabled INTEGER NOT NULL DEFAULT 0,
                is_admin INTEGER NOT NULL DEFAULT 0,
                hashed_password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create users table")?;

        Ok(())
    }

    pub fn get(&self, username: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT username, email, full_name, disabled, is_admin, hashed_password, created_at
             FROM users WHERE username = ?1",
        )?;

        let user = stmt
            .query_row(params![username], row_to_user)
            .optional()
            .context("Failed to query user")?;

        Ok(user)
    }

    pub fn insert(&self, user: &User) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO users (username, email, full_name, disabled, is_admin, hashed_password, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.username,
                user.email,
                user.full_name,
                user.disabled as i64,
                user.is_admin as i64,
                user.hashed_password,
                user.created_at,
            ],
        )
        .context("Failed to insert user")?;

        Ok(())
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT username, email, full_name, disabled, is_admin, hashed_password, created_at
             FROM users ORDER BY username",
        )?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list users")?;

        Ok(users)
    }

    /// Reachability probe for the health endpoint.
    pub fn ping(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .context("Credential store unreachable")?;
        Ok(())
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        username: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        disabled: row.get::<_, i64>(3)? != 0,
        is_admin: row.get::<_, i64>(4)? != 0,
        hashed_password: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path).unwrap();
        (store, temp_file)
    }

    fn sample_user(username: &str) -> User {
        User {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: None,
            disabled: false,
            is_admin: false,
            hashed_password: "digest".to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let (store, _temp) = create_test_store();

        store.insert(&sample_user("alice")).unwrap();

        let found = store.get("alice").unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.email, "alice@example.com");
        assert!(!found.disabled);
        assert!(!found.is_admin);
    }

    #[test]
    fn test_get_missing_is_none() {
        let (store, _temp) = create_test_store();
        assert!(store.get("nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected_by_schema() {
        let (store, _temp) = create_test_store();

        store.insert(&sample_user("alice")).unwrap();
        assert!(store.insert(&sample_user("alice")).is_err());
    }

    #[test]
    fn test_flags_round_trip() {
        let (store, _temp) = create_test_store();

        let mut user = sample_user("root");
        user.disabled = true;
        user.is_admin = true;
        store.insert(&user).unwrap();

        let found = store.get("root").unwrap().unwrap();
        assert!(found.disabled);
        assert!(found.is_admin);
    }

    #[test]
    fn test_list_and_ping() {
        let (store, _temp) = create_test_store();

        store.insert(&sample_user("alice")).unwrap();
        store.insert(&sample_user("bob")).unwrap();

        let users = store.list().unwrap();
        assert_eq!(users.len(), 2);
        store.ping().unwrap();
    }
}
