//! Create handler.
//!
//! `POST [prefix]/hospitals`

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, info};
use vacq_persistence::core::DocumentStorage;

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::model::{HOSPITALS, HospitalSchema, ensure_unique_name};
use crate::responses::DataEnvelope;
use crate::state::AppState;

/// Handler for creating a hospital.
///
/// The body is validated against the hospital schema; unknown fields are
/// dropped and the name must not be in use.
///
/// # Response
///
/// - `201 Created` - `{ success: true, data }`
/// - `400 Bad Request` - Malformed body, failed validation, or duplicate name
///
/// # Example
///
/// ```http
/// POST /api/v1/hospitals HTTP/1.1
/// Content-Type: application/json
///
/// {"name": "Siriraj", "address": "2 Wang Lang Rd", "district": "Bangkok Noi",
///  "province": "Bangkok", "postalcode": "10700", "region": "Central"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody,
) -> RestResult<Response>
where
    S: DocumentStorage + Send + Sync,
{
    debug!("Processing create request");

    let hospital = HospitalSchema::validate_new(body)?;
    if let Some(name) = hospital.get("name").and_then(Value::as_str) {
        ensure_unique_name(state.storage(), name, None).await?;
    }

    let stored = state
        .storage()
        .create(HOSPITALS, Value::Object(hospital))
        .await?;

    info!(id = %stored.id(), "Hospital created");

    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::ok(stored.into_content())),
    )
        .into_response())
}
