//! Notes Test Utilities
//!
//! Shared test infrastructure for the notes workspace:
//! - An in-memory `NoteStore` that behaves like the PostgreSQL accessor
//! - Proptest generators for note input
//! - Fixtures for common scenarios

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Duration, Utc};

pub use notes_core::{
    NewNote, Note, NoteContent, NoteId, NoteName, NotePatch, NoteStore, StorageError,
    StorageResult, Timestamp, ValidationError, DEFAULT_AUTHOR_NAME, RECENT_NOTES_LIMIT,
};

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct Table {
    rows: HashMap<NoteId, Note>,
    next_id: i32,
    last_created_at: Option<Timestamp>,
}

impl Table {
    /// Next `created_at`, strictly after the previous one so ordering is total.
    fn next_timestamp(&mut self) -> Timestamp {
        let now = Utc::now().naive_utc();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }

    fn next_id(&mut self) -> NoteId {
        self.next_id += 1;
        NoteId::new(self.next_id)
    }
}

/// In-memory `NoteStore` with the same contract as the PostgreSQL one.
///
/// Ids start at 1 and increase like a `SERIAL` column. The store can be
/// switched into a failing mode to exercise `database_error` paths.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    table: RwLock<Table>,
    failing: AtomicBool,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `StorageError::Unavailable`.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Insert a row with an explicit creation time, bypassing normalization.
    pub fn seed(&self, name: &str, content: &str, created_at: Timestamp) -> StorageResult<Note> {
        let mut table = self.table.write().map_err(|_| StorageError::LockPoisoned)?;
        let note = Note {
            id: table.next_id(),
            name: name.to_string(),
            content: content.to_string(),
            created_at,
        };
        if table.last_created_at.map_or(true, |last| created_at > last) {
            table.last_created_at = Some(created_at);
        }
        table.rows.insert(note.id, note.clone());
        Ok(note)
    }

    /// Look up a row directly, outside the trait.
    pub fn get(&self, id: NoteId) -> StorageResult<Option<Note>> {
        let table = self.table.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    pub fn note_count(&self) -> StorageResult<usize> {
        let table = self.table.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(table.rows.len())
    }

    fn check_available(&self, operation: &'static str) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                reason: format!("in-memory store set to fail ({operation})"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn note_list_recent(&self, limit: i64) -> StorageResult<Vec<Note>> {
        self.check_available("note_list_recent")?;
        let table = self.table.read().map_err(|_| StorageError::LockPoisoned)?;

        let mut notes: Vec<Note> = table.rows.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        notes.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(notes)
    }

    async fn note_create(&self, note: &NewNote) -> StorageResult<Note> {
        self.check_available("note_create")?;
        let mut table = self.table.write().map_err(|_| StorageError::LockPoisoned)?;

        let created = Note {
            id: table.next_id(),
            name: note.name.as_str().to_string(),
            content: note.content.as_str().to_string(),
            created_at: table.next_timestamp(),
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn note_update(&self, id: NoteId, patch: &NotePatch) -> StorageResult<Option<Note>> {
        self.check_available("note_update")?;
        let mut table = self.table.write().map_err(|_| StorageError::LockPoisoned)?;

        Ok(table.rows.get_mut(&id).map(|note| {
            patch.apply_to(note);
            note.clone()
        }))
    }

    async fn note_delete(&self, id: NoteId) -> StorageResult<bool> {
        self.check_available("note_delete")?;
        let mut table = self.table.write().map_err(|_| StorageError::LockPoisoned)?;
        Ok(table.rows.remove(&id).is_some())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for note input.

    use super::*;
    use proptest::prelude::*;

    /// Content that survives trimming.
    pub fn arb_valid_content() -> impl Strategy<Value = String> {
        ("[ \t\n]{0,3}", "[a-zA-Z0-9][a-zA-Z0-9 .,!?]{0,60}", "[ \t\n]{0,3}")
            .prop_map(|(lead, body, trail)| format!("{lead}{}{trail}", body.trim_end()))
    }

    /// Whitespace-only content.
    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t\r\n]{0,8}"
    }

    /// Raw author name: absent, blank, or a real name with padding.
    pub fn arb_raw_name() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            arb_blank().prop_map(Some),
            ("[ ]{0,2}", "[A-Z][a-z]{1,12}", "[ ]{0,2}")
                .prop_map(|(lead, name, trail)| Some(format!("{lead}{name}{trail}"))),
        ]
    }

    /// A validated insert payload.
    pub fn arb_new_note() -> impl Strategy<Value = NewNote> {
        (arb_raw_name(), arb_valid_content()).prop_filter_map(
            "content must be non-blank",
            |(name, content)| {
                let content = NoteContent::parse(&content).ok()?;
                Some(NewNote {
                    name: NoteName::normalize(name.as_deref()),
                    content,
                })
            },
        )
    }

    /// A patch touching one or both fields.
    pub fn arb_patch() -> impl Strategy<Value = NotePatch> {
        (
            proptest::option::of(arb_raw_name()),
            proptest::option::of(arb_valid_content()),
        )
            .prop_filter_map("patch needs at least one field", |(name, content)| {
                let name = name.map(|raw| NoteName::normalize(raw.as_deref()));
                let content = match content {
                    Some(raw) => Some(NoteContent::parse(&raw).ok()?),
                    None => None,
                };
                NotePatch::from_parts(name, content).ok()
            })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made note input.

    use super::*;

    /// `{name: "Alice", content: "hello"}` as a validated insert.
    pub fn alice_hello() -> StorageResult<NewNote> {
        let content = NoteContent::parse("hello").map_err(|e| StorageError::QueryFailed {
            operation: "fixture",
            reason: e.to_string(),
        })?;
        Ok(NewNote {
            name: NoteName::normalize(Some("Alice")),
            content,
        })
    }

    /// A store pre-filled with `count` notes, one minute apart, oldest first.
    pub fn store_with_notes(count: usize) -> StorageResult<InMemoryNoteStore> {
        let store = InMemoryNoteStore::new();
        let base = Utc::now().naive_utc() - Duration::days(1);
        for i in 0..count {
            let offset = Duration::minutes(i64::try_from(i).unwrap_or(i64::MAX));
            store.seed("Seeder", &format!("note #{i}"), base + offset)?;
        }
        Ok(store)
    }
}
