//! Shared application state for Axum routers.

use std::sync::Arc;

use notes_core::NoteStore;

use crate::db::DbClient;

/// Storage handle shared by all note handlers.
pub type SharedNoteStore = Arc<dyn NoteStore>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedNoteStore,
}

impl AppState {
    pub fn new(store: SharedNoteStore) -> Self {
        Self { store }
    }

    /// State backed by the PostgreSQL pool.
    pub fn from_db(db: DbClient) -> Self {
        Self::new(Arc::new(db))
    }
}

crate::impl_from_ref!(SharedNoteStore, store);
