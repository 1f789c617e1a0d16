//! Training endpoints.
//!
//! Ingestion is pass-through persistence and "training" only records a
//! pending job stub; no model ever runs.

use crate::api::AppState;
use crate::auth::models::CurrentUser;
use crate::errors::ApiError;
use crate::store::documents::{TrainingData, TrainingJob};
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde_json::{json, Value};

/// POST /api/training/data — persist one record, echo it back.
pub async fn add_data(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(data): Json<TrainingData>,
) -> Result<Json<TrainingData>, ApiError> {
    state.documents.insert_training_data(&data, &user.username)?;
    Ok(Json(data))
}

/// POST /api/training/upload — raw JSON array of training records.
///
/// Non-JSON bodies and elements missing `intent`/`patterns`/`responses` are
/// both 400, with distinct messages.
pub async fn upload(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON format"))?;

    let items = raw
        .as_array()
        .ok_or(ApiError::BadRequest("Invalid training data format"))?;

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let data: TrainingData = serde_json::from_value(item.clone())
            .map_err(|_| ApiError::BadRequest("Invalid training data format"))?;
        records.push(data);
    }

    // Validate everything before persisting anything.
    for data in &records {
        state.documents.insert_training_data(data, &user.username)?;
    }

    Ok(Json(json!({
        "message": "Training data uploaded successfully",
        "count": records.len(),
    })))
}

/// POST /api/training/train — record a job stub and return its id.
pub async fn train(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let job_id = state.documents.insert_training_job(&user.username)?;

    Ok(Json(json!({
        "message": "Training job started",
        "job_id": job_id,
    })))
}

/// GET /api/training/status/:job_id
pub async fn status(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Path(job_id): Path<String>,
) -> Result<Json<TrainingJob>, ApiError> {
    state
        .documents
        .get_training_job(&job_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Training job not found".to_string()))
}
