//! Notes Core - Entity Types and Storage Contract
//!
//! Data types shared by the HTTP service and its test utilities:
//! the `Note` entity, normalized field types, typed partial updates,
//! and the async `NoteStore` trait.

pub mod entities;
pub mod error;
pub mod store;

pub use entities::{
    NewNote, Note, NoteContent, NoteId, NoteName, NotePatch, Timestamp, DEFAULT_AUTHOR_NAME,
    RECENT_NOTES_LIMIT,
};
pub use error::{StorageError, StorageResult, ValidationError};
pub use store::NoteStore;
