//! Hospital route configuration.

use axum::{Router, routing::get};
use vacq_persistence::core::CascadingStorage;

use crate::handlers;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
///
/// ## Hospitals (under the configured API prefix, `/api/v1` by default)
/// - `GET /hospitals` - List
/// - `POST /hospitals` - Create
/// - `GET /hospitals/{id}` - Read
/// - `PUT /hospitals/{id}` - Update
/// - `DELETE /hospitals/{id}` - Delete with appointments
///
/// Authentication for the write routes is handled in front of this router.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: CascadingStorage + Send + Sync + 'static,
{
    let hospitals = Router::new()
        .route(
            "/hospitals",
            get(handlers::list_handler::<S>).post(handlers::create_handler::<S>),
        )
        .route(
            "/hospitals/{id}",
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        );

    let system = Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler));

    // Nesting at the root is not allowed
    let prefix = state.config().normalized_prefix();
    let router = if prefix.is_empty() {
        system.merge(hospitals)
    } else {
        system.nest(&prefix, hospitals)
    };

    router.with_state(state)
}
