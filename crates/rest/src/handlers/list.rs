//! List handler.
//!
//! `GET [prefix]/hospitals?[filters]&select=&sort=&page=&limit=`

use std::collections::HashMap;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;
use vacq_persistence::core::DocumentStorage;
use vacq_persistence::types::{
    CREATED_AT_FIELD, ComparisonOperator, FilterExpression, FindQuery, SortDirective,
    StoredDocument,
};

use crate::error::RestResult;
use crate::extractors::ListParams;
use crate::model::{APPOINTMENT_HOSPITAL_FIELD, APPOINTMENTS, APPOINTMENTS_FIELD, HOSPITALS};
use crate::responses::ResultEnvelope;
use crate::state::AppState;

/// Handler for listing hospitals.
///
/// Every non-reserved parameter filters the result; `rating[gte]=4` style
/// keys compare instead of matching exactly. `select` picks fields, `sort`
/// orders (default newest first), `page` and `limit` pick the page. Each
/// hospital carries its appointments.
///
/// # Response
///
/// - `200 OK` - `{ success, count, pagination, data }`
/// - `400 Bad Request` - Invalid field names or storage failure
///
/// `pagination` links are computed against the size of the whole
/// collection, not the filtered result.
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    ListParams(params): ListParams,
) -> RestResult<Response>
where
    S: DocumentStorage + Send + Sync,
{
    debug!(params = ?params, "Processing list request");

    let plan = state.list_query_builder().build(&params)?;
    debug!(
        filter = ?plan.filter,
        sort = ?plan.sort,
        page = plan.pagination.page(),
        limit = plan.pagination.limit(),
        "Built hospital query"
    );

    let total = state
        .storage()
        .count_documents(HOSPITALS, &FilterExpression::new())
        .await?;

    let hospitals = state
        .storage()
        .find(HOSPITALS, &plan.to_find_query())
        .await?;

    let records = populate_appointments(state.storage(), hospitals).await?;
    let envelope = ResultEnvelope::assemble(total, &plan.pagination, records);

    debug!(total, count = envelope.count, "Returning hospitals");

    Ok((StatusCode::OK, Json(envelope)).into_response())
}

/// Attaches each hospital's appointments under `appointments`.
///
/// All appointments of the page are fetched with a single `in` query.
async fn populate_appointments<S>(
    storage: &S,
    hospitals: Vec<StoredDocument>,
) -> RestResult<Vec<Value>>
where
    S: DocumentStorage + ?Sized,
{
    if hospitals.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = hospitals.iter().map(StoredDocument::id).collect();
    let filter = FilterExpression::new().compare(
        APPOINTMENT_HOSPITAL_FIELD,
        ComparisonOperator::In,
        &ids.join(","),
    );
    let query = FindQuery::new()
        .with_filter(filter)
        .with_sort(SortDirective::asc(CREATED_AT_FIELD));

    let mut by_hospital: HashMap<String, Vec<Value>> = HashMap::new();
    for appointment in storage.find(APPOINTMENTS, &query).await? {
        let Some(hospital) = appointment
            .field(APPOINTMENT_HOSPITAL_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            continue;
        };
        by_hospital
            .entry(hospital)
            .or_default()
            .push(appointment.into_content());
    }

    Ok(hospitals
        .into_iter()
        .map(|hospital| {
            let appointments = by_hospital.remove(hospital.id()).unwrap_or_default();
            let mut content = hospital.into_content();
            if let Value::Object(fields) = &mut content {
                fields.insert(APPOINTMENTS_FIELD.to_string(), Value::Array(appointments));
            }
            content
        })
        .collect())
}
