//! # vacq-rest - Hospital REST API
//!
//! This crate provides the hospital endpoints of the VacQ appointment
//! service: listing with filtering, field selection, sorting and pagination,
//! reading, creating, updating, and deleting hospitals together with their
//! appointments.
//!
//! ## Backend Support
//!
//! Storage backends are configured through feature flags:
//!
//! - `sqlite` - SQLite backend (default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vacq_rest::{create_app, ServerConfig};
//! use vacq_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create a storage backend
//!     let backend = SqliteBackend::open("vacq.db")?;
//!     backend.init_schema()?;
//!
//!     // Create the Axum application
//!     let app = create_app(backend);
//!
//!     // Start the server
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | list | GET | `/api/v1/hospitals?params` |
//! | read | GET | `/api/v1/hospitals/{id}` |
//! | create | POST | `/api/v1/hospitals` |
//! | update | PUT | `/api/v1/hospitals/{id}` |
//! | delete | DELETE | `/api/v1/hospitals/{id}` |
//! | health | GET | `/health` |
//! | liveness | GET | `/_liveness` |
//!
//! ## List Parameters
//!
//! | Parameter | Example | Meaning |
//! |-----------|---------|---------|
//! | any field | `region=Central` | Equality filter |
//! | `field[op]` | `postalcode[gte]=10200` | Comparison (`gt`, `gte`, `lt`, `lte`, `in`) |
//! | `select` | `select=name,tel` | Fields to return (`-field` excludes) |
//! | `sort` | `sort=-createdAt,name` | Sort keys (`-` for descending) |
//! | `page` | `page=2` | Page number (default 1) |
//! | `limit` | `limit=10` | Page size (default 25) |
//!
//! ## Error Handling
//!
//! Failures answer `{ "success": false }` with status 400. Deleting a
//! hospital that does not exist adds a `message`; unexpected delete failures
//! answer 500 with `message` and `error`.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their response bodies
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`model`] - Hospital schema and collection names
//! - [`query`] - List query building
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Axum extractors for request bodies and parameters
//! - [`responses`] - Response envelopes
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod query;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{OperatorRewriteMode, ServerConfig};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use vacq_persistence::core::CascadingStorage;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
///
/// # Example
///
/// ```rust,ignore
/// use vacq_rest::create_app;
/// use vacq_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let app = create_app(backend);
/// ```
pub fn create_app<S>(storage: S) -> Router
where
    S: CascadingStorage + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the hospital routes, health endpoints and the middleware stack:
/// request tracing, timeout, body size limit, and optional CORS and request
/// IDs.
///
/// # Example
///
/// ```rust,ignore
/// use vacq_rest::{create_app_with_config, ServerConfig};
/// use vacq_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: CascadingStorage + Send + Sync + 'static,
{
    info!(
        backend = storage.backend_name(),
        prefix = %config.api_prefix,
        "Creating REST API server"
    );

    // Create application state
    let state = AppState::new(Arc::new(storage), config.clone());

    // Build the router with all routes
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = router.layer(DefaultBodyLimit::max(config.max_body_size));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    let router = if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vacq={level},vacq_rest={level},vacq_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
