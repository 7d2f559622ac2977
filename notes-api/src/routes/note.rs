//! Note REST API Routes
//!
//! Axum handlers for the notes collection. Input is normalized before any
//! storage call; storage failures surface as `database_error`.

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use notes_core::{Note, RECENT_NOTES_LIMIT};

use crate::{
    error::{ApiError, ApiResult},
    routes::method_not_allowed,
    extractors::{JsonBody, NoteIdPath},
    state::{AppState, SharedNoteStore},
    types::{CreateNoteRequest, DeleteNoteResponse, UpdateNoteRequest},
};

#[cfg(feature = "openapi")]
use crate::error::ErrorBody;

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /notes - The most recent notes, newest first
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/notes",
    tag = "Notes",
    responses(
        (status = 200, description = "Up to 50 notes, newest first", body = [Note]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
))]
pub async fn list_notes(State(store): State<SharedNoteStore>) -> ApiResult<Json<Vec<Note>>> {
    let notes = store.note_list_recent(RECENT_NOTES_LIMIT).await?;
    Ok(Json(notes))
}

/// POST /notes - Create a note
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/notes",
    tag = "Notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note created", body = Note),
        (status = 400, description = "content_required or invalid_json", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
))]
pub async fn create_note(
    State(store): State<SharedNoteStore>,
    JsonBody(req): JsonBody<CreateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let new_note = req.into_new_note()?;
    let note = store.note_create(&new_note).await?;

    tracing::info!(note_id = %note.id, "Note created");
    Ok(Json(note))
}

/// PATCH /notes/{id} - Update name and/or content
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/notes/{id}",
    tag = "Notes",
    params(
        ("id" = i32, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 400, description = "content_required, no_fields or invalid_json", body = ErrorBody),
        (status = 404, description = "Note not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
))]
pub async fn update_note(
    State(store): State<SharedNoteStore>,
    NoteIdPath(id): NoteIdPath,
    JsonBody(req): JsonBody<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let patch = req.into_patch()?;
    let note = store
        .note_update(id, &patch)
        .await?
        .ok_or_else(|| ApiError::note_not_found(id))?;

    tracing::info!(note_id = %id, "Note updated");
    Ok(Json(note))
}

/// DELETE /notes/{id} - Delete a note
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    params(
        ("id" = i32, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = DeleteNoteResponse),
        (status = 404, description = "Note not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
))]
pub async fn delete_note(
    State(store): State<SharedNoteStore>,
    NoteIdPath(id): NoteIdPath,
) -> ApiResult<Json<DeleteNoteResponse>> {
    if !store.note_delete(id).await? {
        return Err(ApiError::note_not_found(id));
    }

    tracing::info!(note_id = %id, "Note deleted");
    Ok(Json(DeleteNoteResponse { deleted: true }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the note routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(list_notes).post(create_note).fallback(method_not_allowed),
        )
        .route(
            "/notes/:id",
            patch(update_note)
                .delete(delete_note)
                .fallback(method_not_allowed),
        )
}
