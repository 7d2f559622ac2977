//! Custom extractors whose rejections render as `ApiError`.
//!
//! - `NoteIdPath` parses the `:id` segment into a `NoteId`
//! - `JsonBody<T>` parses a JSON body, treating an empty body as `{}`;
//!   bodies over axum's default limit are rejected with `payload_too_large`

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
};
use notes_core::NoteId;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Note id taken from the path.
///
/// A segment that is not an integer cannot name any stored note, so the
/// rejection is `not_found` rather than a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteIdPath(pub NoteId);

#[async_trait]
impl<S> FromRequestParts<S> for NoteIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::note_not_found(format!("'{}' ({})", parts.uri.path(), e)))?;

        raw.parse::<NoteId>()
            .map(NoteIdPath)
            .map_err(|_| ApiError::note_not_found(format!("'{}'", raw)))
    }
}

/// JSON request body.
///
/// Unlike `axum::Json`, no `Content-Type` is required and an empty body
/// yields `T::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::payload_too_large(e.body_text())
                } else {
                    ApiError::invalid_json(e.body_text())
                }
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        let value = serde_json::from_slice::<T>(&bytes)?;
        Ok(JsonBody(value))
    }
}
