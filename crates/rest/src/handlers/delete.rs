//! Delete handler.
//!
//! `DELETE [prefix]/hospitals/{id}`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, info};
use vacq_persistence::core::CascadingStorage;
use vacq_persistence::error::StorageError;

use crate::error::{RestError, RestResult};
use crate::model::{HOSPITALS, hospital_dependents};
use crate::responses::DataEnvelope;
use crate::state::AppState;

/// Handler for deleting a hospital.
///
/// The hospital's appointments are removed in the same transaction.
///
/// # Response
///
/// - `200 OK` - `{ success: true, data: {} }`
/// - `400 Bad Request` - `{ success: false, message }` when no hospital has this ID
/// - `500 Internal Server Error` - `{ success: false, message, error }` for any
///   other failure, including a malformed ID
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: CascadingStorage + Send + Sync,
{
    debug!(id = %id, "Processing delete request");

    let existing = state
        .storage()
        .find_by_id(HOSPITALS, &id)
        .await
        .map_err(server_error)?;

    if existing.is_none() {
        return Err(RestError::reported(
            StatusCode::BAD_REQUEST,
            format!("Hospital not found with id of {}", id),
        ));
    }

    let result = state
        .storage()
        .delete_cascade(HOSPITALS, &id, &hospital_dependents())
        .await
        .map_err(server_error)?;

    info!(
        id = %id,
        deleted = result.deleted,
        appointments_deleted = result.dependents_deleted,
        "Hospital deleted"
    );

    Ok((StatusCode::OK, Json(DataEnvelope::ok(json!({})))).into_response())
}

fn server_error(err: StorageError) -> RestError {
    error!(error = %err, "Error deleting hospital");
    RestError::Reported {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Server error while deleting hospital".to_string(),
        error: Some(err.to_string()),
    }
}
