//! Axum extractors for hospital requests.
//!
//! - [`JsonBody`] - A JSON request body; malformed bodies answer `{ "success": false }`
//! - [`ListParams`] - The raw query parameters of a list request

mod json_body;
mod list_params;

pub use json_body::{JsonBody, JsonBodyRejection};
pub use list_params::ListParams;
