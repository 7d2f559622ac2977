//! OpenAPI Specification for the Notes API
//!
//! Generated with utoipa from the route annotations and body types.

use utoipa::OpenApi;

use crate::error::{ErrorBody, ErrorCode};
use crate::routes::{health, note};
use crate::types::{
    CreateNoteRequest, DeleteNoteResponse, HealthResponse, HealthStatus, UpdateNoteRequest,
};
use notes_core::Note;

/// OpenAPI document for the Notes API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes API",
        description = "Create, list, edit and delete short text notes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Notes", description = "The notes collection"),
        (name = "Health", description = "Liveness probe")
    ),
    paths(
        health::health,
        note::list_notes,
        note::create_note,
        note::update_note,
        note::delete_note,
    ),
    components(schemas(
        Note,
        CreateNoteRequest,
        UpdateNoteRequest,
        DeleteNoteResponse,
        HealthResponse,
        HealthStatus,
        ErrorBody,
        ErrorCode,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "Notes API");

        let paths = &openapi.paths.paths;
        assert!(paths.contains_key("/health"));
        assert!(paths.contains_key("/notes"));
        assert!(paths.contains_key("/notes/{id}"));
    }

    #[test]
    fn test_openapi_schemas_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components present");
        for name in ["Note", "CreateNoteRequest", "UpdateNoteRequest", "ErrorBody"] {
            assert!(components.schemas.contains_key(name), "missing schema {name}");
        }
    }

    #[test]
    fn test_openapi_json_serializes() -> Result<(), serde_json::Error> {
        let json = ApiDoc::to_json()?;
        assert!(json.contains("\"/notes/{id}\""));
        Ok(())
    }
}
