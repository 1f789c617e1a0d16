//! Chat endpoints.
//!
//! Pass-through persistence: messages are logged to the document store and
//! the reply is a canned stub. There is no language processing behind this.

use crate::api::AppState;
use crate::auth::models::CurrentUser;
use crate::errors::ApiError;
use crate::store::documents::ChatMessage;
use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub confidence: f64,
    pub intent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

/// POST /api/chat/send
pub async fn send_message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        username: user.username,
        content: request.content,
        timestamp: request.timestamp.unwrap_or_else(Utc::now),
    };

    state.documents.insert_message(&message)?;

    Ok(Json(ChatResponse {
        message: "Message received. Automated processing is not implemented yet.".to_string(),
        confidence: 1.0,
        intent: Some("general".to_string()),
    }))
}

/// GET /api/chat/history?limit=N — caller's messages, newest first.
pub async fn get_history(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let limit = query.limit.unwrap_or(50).min(500);
    let messages = state.documents.recent_messages(&user.username, limit)?;
    Ok(Json(messages))
}
