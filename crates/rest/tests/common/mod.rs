//! Shared helpers for the REST integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};
use vacq_persistence::backends::sqlite::SqliteBackend;
use vacq_persistence::core::DocumentStorage;
use vacq_rest::{AppState, ServerConfig};

/// Base path of the hospital routes under the default prefix.
pub const HOSPITALS_PATH: &str = "/api/v1/hospitals";

/// Creates a test server over a fresh in-memory backend.
pub fn create_test_server() -> (TestServer, Arc<SqliteBackend>) {
    create_test_server_with_config(ServerConfig::for_testing())
}

/// Creates a test server over a fresh in-memory backend with `config`.
pub fn create_test_server_with_config(config: ServerConfig) -> (TestServer, Arc<SqliteBackend>) {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to init schema");
    let backend = Arc::new(backend);

    let state = AppState::new(Arc::clone(&backend), config);
    let app = vacq_rest::routing::create_routes(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, backend)
}

/// A valid hospital body with the given name.
pub fn hospital(name: &str) -> Value {
    json!({
        "name": name,
        "address": "1873 Rama IV Rd",
        "district": "Pathum Wan",
        "province": "Bangkok",
        "postalcode": "10330",
        "tel": "02-256-4000",
        "region": "Central"
    })
}

/// Stores a hospital directly in the backend and returns its id.
pub async fn seed_hospital(backend: &SqliteBackend, body: Value) -> String {
    backend
        .create("hospitals", body)
        .await
        .expect("Failed to seed hospital")
        .id()
        .to_string()
}

/// Stores an appointment for `hospital_id` and returns its id.
pub async fn seed_appointment(backend: &SqliteBackend, hospital_id: &str, user: &str) -> String {
    backend
        .create(
            "appointments",
            json!({
                "apptDate": "2021-06-01T09:00:00Z",
                "user": user,
                "hospital": hospital_id
            }),
        )
        .await
        .expect("Failed to seed appointment")
        .id()
        .to_string()
}

/// Seeds three hospitals in different regions.
///
/// Returns their ids in insertion order.
pub async fn seed_regions(backend: &SqliteBackend) -> Vec<String> {
    let mut ids = Vec::new();
    for (name, region, postalcode) in [
        ("Chulalongkorn", "Central", "10330"),
        ("Maharaj Nakorn", "North", "50200"),
        ("Songklanagarind", "South", "90110"),
    ] {
        let mut body = hospital(name);
        body["region"] = json!(region);
        body["postalcode"] = json!(postalcode);
        ids.push(seed_hospital(backend, body).await);
    }
    ids
}

/// Extracts the `name` of every record in a list response.
pub fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data is an array")
        .iter()
        .map(|h| h["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
