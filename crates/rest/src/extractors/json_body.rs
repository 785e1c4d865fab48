//! JSON body extractor.
//!
//! Extracts a JSON document from the request body. Unlike `axum::Json`, a
//! rejection is rendered through [`RestError`] so clients always receive the
//! `{ "success": false }` envelope.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::RestError;

/// Axum extractor for JSON request bodies.
///
/// # Example
///
/// ```rust,ignore
/// use vacq_rest::extractors::JsonBody;
///
/// async fn create_handler(JsonBody(body): JsonBody) {
///     println!("name: {}", body["name"]);
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl JsonBody {
    /// Consumes the extractor and returns the inner Value.
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Error type for body extraction failures.
#[derive(Debug)]
pub enum JsonBodyRejection {
    /// The body could not be read or is not valid JSON.
    InvalidJson(String),
    /// The request declares a non-JSON content type.
    UnsupportedMediaType(String),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let error = match self {
            JsonBodyRejection::InvalidJson(msg) => RestError::BadRequest {
                message: format!("Invalid JSON: {}", msg),
            },
            JsonBodyRejection::UnsupportedMediaType(ct) => RestError::BadRequest {
                message: format!("Unsupported media type: {}", ct),
            },
        };
        error.into_response()
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Must own the string before moving req
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        if !content_type.contains("json") {
            return Err(JsonBodyRejection::UnsupportedMediaType(content_type));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonBodyRejection::InvalidJson(e.to_string()))?;

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| JsonBodyRejection::InvalidJson(e.to_string()))?;

        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/hospitals");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_json_object() {
        let JsonBody(value) =
            JsonBody::from_request(request(Some("application/json"), r#"{"name":"A"}"#), &())
                .await
                .unwrap();
        assert_eq!(value["name"], "A");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json() {
        let body = JsonBody::from_request(request(None, "[1,2]"), &())
            .await
            .unwrap();
        assert_eq!(body.into_inner(), serde_json::json!([1, 2]));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let rejection = JsonBody::from_request(request(Some("application/json"), "{name"), &())
            .await
            .unwrap_err();
        assert!(matches!(rejection, JsonBodyRejection::InvalidJson(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_json_content_type_is_rejected() {
        let rejection = JsonBody::from_request(request(Some("text/plain"), "{}"), &())
            .await
            .unwrap_err();
        assert!(matches!(rejection, JsonBodyRejection::UnsupportedMediaType(_)));
    }
}
