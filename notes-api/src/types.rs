//! Request and response bodies for the REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Body of `POST /notes`.
///
/// Fields stay raw JSON so any scalar can be coerced to text; `null`
/// counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateNoteRequest {
    /// Author label; blank or absent becomes "Anonym"
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub name: Option<JsonValue>,

    /// Note body; required, must not be blank
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub content: Option<JsonValue>,
}

/// Body of `PATCH /notes/{id}`. At least one field must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateNoteRequest {
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub name: Option<JsonValue>,

    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub content: Option<JsonValue>,
}

/// Body returned by `DELETE /notes/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeleteNoteResponse {
    pub deleted: bool,
}

/// Liveness status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

/// Body returned by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
}

impl HealthResponse {
    pub const OK: Self = Self {
        status: HealthStatus::Ok,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fields_are_absent() -> Result<(), serde_json::Error> {
        let req: UpdateNoteRequest = serde_json::from_value(json!({ "name": null }))?;
        assert_eq!(req, UpdateNoteRequest::default());
        Ok(())
    }

    #[test]
    fn test_unknown_fields_ignored() -> Result<(), serde_json::Error> {
        let req: CreateNoteRequest =
            serde_json::from_value(json!({ "content": "hi", "color": "blue" }))?;
        assert_eq!(req.content, Some(json!("hi")));
        assert_eq!(req.name, None);
        Ok(())
    }

    #[test]
    fn test_health_and_delete_bodies() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_value(HealthResponse::OK)?, json!({ "status": "ok" }));
        assert_eq!(
            serde_json::to_value(DeleteNoteResponse { deleted: true })?,
            json!({ "deleted": true })
        );
        Ok(())
    }
}
