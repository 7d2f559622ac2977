//! Async storage contract for notes.
//!
//! The HTTP layer only talks to storage through this trait. The PostgreSQL
//! implementation lives in notes-api; an in-memory one lives in
//! notes-test-utils.

use async_trait::async_trait;

use crate::entities::{NewNote, Note, NoteId, NotePatch};
use crate::error::StorageResult;

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Most recent notes first, at most `limit` of them.
    async fn note_list_recent(&self, limit: i64) -> StorageResult<Vec<Note>>;

    /// Insert a note and return it with the storage-assigned fields.
    async fn note_create(&self, note: &NewNote) -> StorageResult<Note>;

    /// Apply a patch. `None` when no note has this id.
    async fn note_update(&self, id: NoteId, patch: &NotePatch) -> StorageResult<Option<Note>>;

    /// Remove a note. `false` when no note has this id.
    async fn note_delete(&self, id: NoteId) -> StorageResult<bool>;
}
