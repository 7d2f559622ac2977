//! Note entity and its normalized field types

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Author label stored when no usable name is supplied.
pub const DEFAULT_AUTHOR_NAME: &str = "Anonym";

/// Size of the recent-notes window returned by listing.
pub const RECENT_NOTES_LIMIT: i64 = 50;

/// Creation timestamp as stored by the `TIMESTAMP` column (no time zone).
pub type Timestamp = NaiveDateTime;

// ============================================================================
// IDENTIFIER
// ============================================================================

/// Storage-assigned note identifier (`SERIAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i32);

impl NoteId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<i32> for NoteId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(Self)
    }
}

// ============================================================================
// NORMALIZED FIELDS
// ============================================================================

/// Trimmed author name. Never empty: blank input becomes [`DEFAULT_AUTHOR_NAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteName(String);

impl NoteName {
    /// Normalize an optional raw name. Absent and blank both map to the default.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => Self(trimmed.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteName {
    fn default() -> Self {
        Self(DEFAULT_AUTHOR_NAME.to_string())
    }
}

impl From<NoteName> for String {
    fn from(name: NoteName) -> Self {
        name.0
    }
}

/// Trimmed, non-empty note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContent(String);

impl NoteContent {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::ContentRequired);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NoteContent> for String {
    fn from(content: NoteContent) -> Self {
        content.0
    }
}

// ============================================================================
// ENTITY
// ============================================================================

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Note {
    #[cfg_attr(feature = "openapi", schema(value_type = i32))]
    pub id: NoteId,
    pub name: String,
    pub content: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Validated input for inserting a note. Storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub name: NoteName,
    pub content: NoteContent,
}

/// A partial update that always touches at least one field.
///
/// Each variant corresponds to one fixed UPDATE statement, so there is no
/// way to build an empty or open-ended update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotePatch {
    Name(NoteName),
    Content(NoteContent),
    Both { name: NoteName, content: NoteContent },
}

impl NotePatch {
    /// Combine optional fields into a patch, rejecting the empty case.
    pub fn from_parts(
        name: Option<NoteName>,
        content: Option<NoteContent>,
    ) -> Result<Self, ValidationError> {
        match (name, content) {
            (Some(name), Some(content)) => Ok(Self::Both { name, content }),
            (Some(name), None) => Ok(Self::Name(name)),
            (None, Some(content)) => Ok(Self::Content(content)),
            (None, None) => Err(ValidationError::NoFields),
        }
    }

    pub fn name(&self) -> Option<&NoteName> {
        match self {
            Self::Name(name) | Self::Both { name, .. } => Some(name),
            Self::Content(_) => None,
        }
    }

    pub fn content(&self) -> Option<&NoteContent> {
        match self {
            Self::Content(content) | Self::Both { content, .. } => Some(content),
            Self::Name(_) => None,
        }
    }

    /// Apply the patch to an in-memory note. `id` and `created_at` are untouched.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(name) = self.name() {
            note.name = name.as_str().to_string();
        }
        if let Some(content) = self.content() {
            note.content = content.as_str().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn sample_note() -> Note {
        Note {
            id: NoteId::new(7),
            name: "Alice".to_string(),
            content: "hello".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
        }
    }

    #[test]
    fn test_name_defaults_when_absent_or_blank() {
        assert_eq!(NoteName::normalize(None).as_str(), DEFAULT_AUTHOR_NAME);
        assert_eq!(NoteName::normalize(Some("")).as_str(), DEFAULT_AUTHOR_NAME);
        assert_eq!(NoteName::normalize(Some(" \t\n")).as_str(), DEFAULT_AUTHOR_NAME);
        assert_eq!(NoteName::normalize(Some("  ")), NoteName::default());
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(NoteName::normalize(Some("  Alice ")).as_str(), "Alice");
    }

    #[test]
    fn test_content_rejects_whitespace() {
        assert_eq!(NoteContent::parse("   "), Err(ValidationError::ContentRequired));
        assert_eq!(NoteContent::parse(""), Err(ValidationError::ContentRequired));
    }

    #[test]
    fn test_content_is_trimmed() -> Result<(), ValidationError> {
        assert_eq!(NoteContent::parse("\n hello \n")?.as_str(), "hello");
        Ok(())
    }

    #[test]
    fn test_patch_requires_a_field() {
        assert_eq!(NotePatch::from_parts(None, None), Err(ValidationError::NoFields));
    }

    #[test]
    fn test_patch_variants() -> Result<(), ValidationError> {
        let name = NoteName::normalize(Some("Bob"));
        let content = NoteContent::parse("body")?;

        let patch = NotePatch::from_parts(Some(name.clone()), None)?;
        assert!(matches!(patch, NotePatch::Name(_)));
        assert!(patch.content().is_none());

        let patch = NotePatch::from_parts(None, Some(content.clone()))?;
        assert!(matches!(patch, NotePatch::Content(_)));
        assert!(patch.name().is_none());

        let patch = NotePatch::from_parts(Some(name), Some(content))?;
        assert!(matches!(patch, NotePatch::Both { .. }));
        Ok(())
    }

    #[test]
    fn test_patch_apply_keeps_identity() -> Result<(), ValidationError> {
        let mut note = sample_note();
        let before = note.clone();

        NotePatch::Content(NoteContent::parse("changed")?).apply_to(&mut note);
        assert_eq!(note.content, "changed");
        assert_eq!(note.name, before.name);
        assert_eq!(note.id, before.id);
        assert_eq!(note.created_at, before.created_at);

        NotePatch::Name(NoteName::normalize(Some(""))).apply_to(&mut note);
        assert_eq!(note.name, DEFAULT_AUTHOR_NAME);
        Ok(())
    }

    #[test]
    fn test_note_id_parse() {
        assert_eq!("42".parse::<NoteId>().ok(), Some(NoteId::new(42)));
        assert!("abc".parse::<NoteId>().is_err());
        assert!("".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_note_serializes_flat_id() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(sample_note())?;
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["content"], "hello");
        assert!(json["created_at"].is_string());
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_name_never_blank(raw in proptest::option::of(".*")) {
            let name = NoteName::normalize(raw.as_deref());
            prop_assert!(!name.as_str().trim().is_empty());
            prop_assert_eq!(name.as_str(), name.as_str().trim());
        }

        #[test]
        fn prop_content_parse_matches_trim(raw in ".*") {
            match NoteContent::parse(&raw) {
                Ok(content) => prop_assert_eq!(content.as_str(), raw.trim()),
                Err(err) => {
                    prop_assert_eq!(err, ValidationError::ContentRequired);
                    prop_assert!(raw.trim().is_empty());
                }
            }
        }
    }
}
