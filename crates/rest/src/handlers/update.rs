//! Update handler.
//!
//! `PUT [prefix]/hospitals/{id}`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;
use vacq_persistence::core::DocumentStorage;

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::model::{HOSPITALS, HospitalSchema, ensure_unique_name};
use crate::responses::DataEnvelope;
use crate::state::AppState;

/// Handler for updating a hospital.
///
/// Provided fields replace the stored ones; only those fields are validated.
///
/// # Response
///
/// - `200 OK` - `{ success: true, data }` with the updated hospital, or
///   `data: null` when no hospital has this ID
/// - `400 Bad Request` - Malformed ID or body, or failed validation
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> RestResult<Response>
where
    S: DocumentStorage + Send + Sync,
{
    debug!(id = %id, "Processing update request");

    let changes = HospitalSchema::validate_changes(body)?;
    if let Some(name) = changes.get("name").and_then(Value::as_str) {
        ensure_unique_name(state.storage(), name, Some(&id)).await?;
    }

    let updated = state
        .storage()
        .find_by_id_and_update(HOSPITALS, &id, Value::Object(changes))
        .await?;

    let data = match updated {
        Some(stored) => stored.into_content(),
        None => {
            debug!(id = %id, "No hospital to update");
            Value::Null
        }
    };

    Ok((StatusCode::OK, Json(DataEnvelope::ok(data))).into_response())
}
