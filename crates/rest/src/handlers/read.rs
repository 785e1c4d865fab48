//! Read handler.
//!
//! `GET [prefix]/hospitals/{id}`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use vacq_persistence::core::DocumentStorage;

use crate::error::{RestError, RestResult};
use crate::model::HOSPITALS;
use crate::responses::DataEnvelope;
use crate::state::AppState;

/// Handler for reading one hospital.
///
/// # Response
///
/// - `200 OK` - `{ success: true, data }`
/// - `400 Bad Request` - No such hospital, or the ID is malformed
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    S: DocumentStorage + Send + Sync,
{
    debug!(id = %id, "Processing read request");

    match state.storage().find_by_id(HOSPITALS, &id).await? {
        Some(stored) => Ok((
            StatusCode::OK,
            Json(DataEnvelope::ok(stored.into_content())),
        )
            .into_response()),
        None => {
            debug!(id = %id, "Hospital not found");
            Err(RestError::NotFound {
                collection: HOSPITALS.to_string(),
                id,
            })
        }
    }
}
