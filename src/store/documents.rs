//! Document store for chat messages and training records.
//!
//! Pure pass-through persistence: rows go in typed, come out typed, and no
//! processing happens in between. Training jobs are stubs that never leave
//! the "pending" state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logged chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// One intent's worth of training material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingData {
    pub intent: String,
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

/// Training job stub. Recorded, never executed.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingJob {
    pub id: String,
    pub status: String,
    pub progress: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub metrics: Option<serde_json::Value>,
}

pub struct DocumentStore {
    db_path: String,
}

impl DocumentStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_user
                ON messages(username, timestamp DESC);

            CREATE TABLE IF NOT EXISTS training_data (
                id TEXT PRIMARY KEY,
                intent TEXT NOT NULL,
                patterns TEXT NOT NULL,
                responses TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS training_jobs (
                id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                progress REAL NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                metrics TEXT
            );",
        )
        .context("Failed to create document tables")?;

        Ok(())
    }

    pub fn insert_message(&self, message: &ChatMessage) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO messages (id, username, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                message.id,
                message.username,
                message.content,
                message.timestamp.to_rfc3339(),
            ],
        )
        .context("Failed to insert message")?;

        Ok(())
    }

    /// Most recent messages for one user, newest first.
    pub fn recent_messages(&self, username: &str, limit: u32) -> Result<Vec<ChatMessage>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, username, content, timestamp FROM messages
             WHERE username = ?1 ORDER BY timestamp DESC LIMIT ?2",
        )?;

        let messages = stmt
            .query_map(params![username, limit], |row| {
                let raw: String = row.get(3)?;
                let timestamp = DateTime::parse_from_rfc3339(&raw)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(ChatMessage {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    content: row.get(2)?,
                    timestamp,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read message history")?;

        Ok(messages)
    }

    pub fn insert_training_data(&self, data: &TrainingData, created_by: &str) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO training_data (id, intent, patterns, responses, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Uuid::new_v4().to_string(),
                data.intent,
                serde_json::to_string(&data.patterns)?,
                serde_json::to_string(&data.responses)?,
                created_by,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("Failed to insert training data")?;

        Ok(())
    }

    /// Record a pending job stub and return its id. No training runs.
    pub fn insert_training_job(&self, created_by: &str) -> Result<String> {
        let conn = Connection::open(&self.db_path)?;
        let id = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO training_jobs (id, status, progress, created_by, created_at)
             VALUES (?1, 'pending', 0.0, ?2, ?3)",
            params![id, created_by, Utc::now().to_rfc3339()],
        )
        .context("Failed to insert training job")?;

        Ok(id)
    }

    pub fn get_training_job(&self, job_id: &str) -> Result<Option<TrainingJob>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, status, progress, created_by, created_at, updated_at, metrics
             FROM training_jobs WHERE id = ?1",
        )?;

        let job = stmt
            .query_row(params![job_id], |row| {
                let created_raw: String = row.get(4)?;
                let updated_raw: Option<String> = row.get(5)?;
                let metrics_raw: Option<String> = row.get(6)?;
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, String>(3)?,
                    created_raw,
                    updated_raw,
                    metrics_raw,
                ))
            })
            .optional()
            .context("Failed to query training job")?;

        let Some((id, status, progress, created_by, created_raw, updated_raw, metrics_raw)) = job
        else {
            return Ok(None);
        };

        let created_at = DateTime::parse_from_rfc3339(&created_raw)
            .context("Malformed job timestamp")?
            .with_timezone(&Utc);
        let updated_at = updated_raw
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .context("Malformed job timestamp")?
            .map(|t| t.with_timezone(&Utc));
        let metrics = metrics_raw
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .context("Malformed job metrics")?;

        Ok(Some(TrainingJob {
            id,
            status,
            progress,
            created_by,
            created_at,
            updated_at,
            metrics,
        }))
    }

    /// Reachability probe for the health endpoint.
    pub fn ping(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .context("Document store unreachable")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (DocumentStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = DocumentStore::new(temp_file.path().to_str().unwrap()).unwrap();
        (store, temp_file)
    }

    fn message(username: &str, content: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_messages_round_trip_newest_first() {
        let (store, _temp) = create_test_store();

        let mut first = message("alice", "hello");
        first.timestamp = Utc::now() - chrono::Duration::seconds(10);
        store.insert_message(&first).unwrap();
        store.insert_message(&message("alice", "world")).unwrap();
        store.insert_message(&message("bob", "other user")).unwrap();

        let history = store.recent_messages("alice", 50).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "world");
        assert_eq!(history[1].content, "hello");
    }

    #[test]
    fn test_history_limit() {
        let (store, _temp) = create_test_store();

        for i in 0..5 {
            store
                .insert_message(&message("alice", &format!("m{i}")))
                .unwrap();
        }

        assert_eq!(store.recent_messages("alice", 3).unwrap().len(), 3);
    }

    #[test]
    fn test_training_job_stub() {
        let (store, _temp) = create_test_store();

        let id = store.insert_training_job("alice").unwrap();
        let job = store.get_training_job(&id).unwrap().unwrap();

        assert_eq!(job.status, "pending");
        assert_eq!(job.progress, 0.0);
        assert_eq!(job.created_by, "alice");
        assert!(job.updated_at.is_none());
        assert!(job.metrics.is_none());
    }

    #[test]
    fn test_unknown_job_is_none() {
        let (store, _temp) = create_test_store();
        assert!(store.get_training_job("missing").unwrap().is_none());
    }

    #[test]
    fn test_training_data_insert() {
        let (store, _temp) = create_test_store();

        let data = TrainingData {
            intent: "greeting".to_string(),
            patterns: vec!["hi".to_string(), "hello".to_string()],
            responses: vec!["hey there".to_string()],
        };

        store.insert_training_data(&data, "alice").unwrap();
        store.ping().unwrap();
    }
}
