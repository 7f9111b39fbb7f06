use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use notekeeper_core::error::NotesError;
use notekeeper_core::{NewNote, Note, NotePatch};

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::obs::CorrelationId;

/// Decode a JSON body. An empty body reads as `{}`, so absent fields stay absent.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError(NotesError::BadRequest(format!("invalid JSON body: {e}"))))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(trace): Extension<CorrelationId>,
    body: Bytes,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let new: NewNote = parse_body(&body)?;
    let note = state.store().create(new);
    tracing::debug!(trace_id = %trace.as_str(), note_id = %note.id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Note>> {
    Json(state.store().list())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.store().get(&id)?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Note>, ApiError> {
    let patch: NotePatch = parse_body(&body)?;
    Ok(Json(state.store().update(&id, patch)?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(trace): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store().delete(&id)?;
    tracing::debug!(trace_id = %trace.as_str(), note_id = %id, "note deleted");
    Ok(Json(json!({ "message": "Deleted" })))
}
