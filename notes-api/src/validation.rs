//! Input normalization.
//!
//! Turns raw request bodies into validated core types before any storage
//! call is made.

use notes_core::{NewNote, NoteContent, NoteName, NotePatch, ValidationError};
use serde_json::Value as JsonValue;

use crate::types::{CreateNoteRequest, UpdateNoteRequest};

/// Coerce a JSON value to text.
///
/// Strings pass through, numbers and booleans use their literal form.
/// Arrays join their coerced elements with `,` (a `null` element adds
/// nothing), objects use their compact JSON text. `null` yields `None`.
pub fn coerce_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Array(items) => Some(
            items
                .iter()
                .map(|item| coerce_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        JsonValue::Object(_) => Some(value.to_string()),
    }
}

/// `null`, `false`, zero and `""` carry no value when creating a note.
fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => false,
    }
}

fn field_text(field: &Option<JsonValue>) -> Option<String> {
    field.as_ref().and_then(coerce_text)
}

fn truthy_field_text(field: &Option<JsonValue>) -> Option<String> {
    field
        .as_ref()
        .filter(|value| !is_falsy(value))
        .and_then(coerce_text)
}

impl CreateNoteRequest {
    /// Validate and normalize into an insert payload.
    ///
    /// Falsy values (`false`, `0`) count as missing here, so `{"content": 0}`
    /// is rejected and `{"name": false}` gets the default name.
    pub fn into_new_note(self) -> Result<NewNote, ValidationError> {
        let content =
            NoteContent::parse(truthy_field_text(&self.content).as_deref().unwrap_or(""))?;
        let name = NoteName::normalize(truthy_field_text(&self.name).as_deref());
        Ok(NewNote { name, content })
    }
}

impl UpdateNoteRequest {
    /// Validate and normalize into a typed patch.
    ///
    /// A blank `content` is rejected; a blank `name` becomes the default.
    /// Unlike create, `false` and `0` are kept as the text "false" and "0".
    pub fn into_patch(self) -> Result<NotePatch, ValidationError> {
        let name = field_text(&self.name).map(|raw| NoteName::normalize(Some(&raw)));
        let content = field_text(&self.content)
            .map(|raw| NoteContent::parse(&raw))
            .transpose()?;
        NotePatch::from_parts(name, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::DEFAULT_AUTHOR_NAME;
    use serde_json::json;

    fn create(body: JsonValue) -> Result<NewNote, ValidationError> {
        serde_json::from_value::<CreateNoteRequest>(body)
            .map_err(|_| ValidationError::ContentRequired)?
            .into_new_note()
    }

    fn update(body: JsonValue) -> Result<NotePatch, ValidationError> {
        serde_json::from_value::<UpdateNoteRequest>(body)
            .map_err(|_| ValidationError::NoFields)?
            .into_patch()
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(&json!(null)), None);
        assert_eq!(coerce_text(&json!("a")), Some("a".to_string()));
        assert_eq!(coerce_text(&json!(42)), Some("42".to_string()));
        assert_eq!(coerce_text(&json!(true)), Some("true".to_string()));
        assert_eq!(coerce_text(&json!([1, 2])), Some("1,2".to_string()));
        assert_eq!(coerce_text(&json!(["a", null, "b"])), Some("a,,b".to_string()));
        assert_eq!(coerce_text(&json!([["a", "b"], "c"])), Some("a,b,c".to_string()));
        assert_eq!(coerce_text(&json!([])), Some(String::new()));
        assert_eq!(coerce_text(&json!({ "k": 1 })), Some("{\"k\":1}".to_string()));
    }

    #[test]
    fn test_create_treats_falsy_as_missing() -> Result<(), ValidationError> {
        for content in [json!(0), json!(0.0), json!(false), json!([]), json!(""), json!([null])] {
            assert_eq!(
                create(json!({ "content": content })),
                Err(ValidationError::ContentRequired)
            );
        }

        let note = create(json!({ "name": 0, "content": "x" }))?;
        assert_eq!(note.name.as_str(), DEFAULT_AUTHOR_NAME);
        let note = create(json!({ "name": false, "content": "x" }))?;
        assert_eq!(note.name.as_str(), DEFAULT_AUTHOR_NAME);

        let note = create(json!({ "name": ["a", "b"], "content": ["x", 1] }))?;
        assert_eq!(note.name.as_str(), "a,b");
        assert_eq!(note.content.as_str(), "x,1");
        Ok(())
    }

    #[test]
    fn test_update_keeps_falsy_scalars() -> Result<(), ValidationError> {
        let patch = update(json!({ "name": false, "content": 0 }))?;
        assert_eq!(patch.name().map(NoteName::as_str), Some("false"));
        assert_eq!(patch.content().map(NoteContent::as_str), Some("0"));

        assert_eq!(
            update(json!({ "content": [] })),
            Err(ValidationError::ContentRequired)
        );
        Ok(())
    }

    #[test]
    fn test_create_trims_and_defaults() -> Result<(), ValidationError> {
        let note = create(json!({ "name": "  Alice ", "content": " hello " }))?;
        assert_eq!(note.name.as_str(), "Alice");
        assert_eq!(note.content.as_str(), "hello");

        let note = create(json!({ "content": "hello" }))?;
        assert_eq!(note.name.as_str(), DEFAULT_AUTHOR_NAME);

        let note = create(json!({ "name": "   ", "content": "hello" }))?;
        assert_eq!(note.name.as_str(), DEFAULT_AUTHOR_NAME);
        Ok(())
    }

    #[test]
    fn test_create_requires_content() {
        assert_eq!(create(json!({})), Err(ValidationError::ContentRequired));
        assert_eq!(
            create(json!({ "content": "   " })),
            Err(ValidationError::ContentRequired)
        );
        assert_eq!(
            create(json!({ "name": "Bob", "content": null })),
            Err(ValidationError::ContentRequired)
        );
    }

    #[test]
    fn test_create_coerces_numbers() -> Result<(), ValidationError> {
        let note = create(json!({ "name": 7, "content": 12.5 }))?;
        assert_eq!(note.name.as_str(), "7");
        assert_eq!(note.content.as_str(), "12.5");
        Ok(())
    }

    #[test]
    fn test_update_requires_a_field() {
        assert_eq!(update(json!({})), Err(ValidationError::NoFields));
        assert_eq!(
            update(json!({ "name": null, "content": null })),
            Err(ValidationError::NoFields)
        );
    }

    #[test]
    fn test_update_blank_name_defaults() -> Result<(), ValidationError> {
        let patch = update(json!({ "name": "" }))?;
        assert_eq!(patch, NotePatch::Name(NoteName::default()));
        Ok(())
    }

    #[test]
    fn test_update_blank_content_rejected() {
        assert_eq!(
            update(json!({ "name": "Bob", "content": " \n" })),
            Err(ValidationError::ContentRequired)
        );
    }

    #[test]
    fn test_update_both_fields() -> Result<(), ValidationError> {
        let patch = update(json!({ "name": " Bob ", "content": " new " }))?;
        assert_eq!(patch.name().map(NoteName::as_str), Some("Bob"));
        assert_eq!(patch.content().map(NoteContent::as_str), Some("new"));
        Ok(())
    }
}
