//! HTTP request handlers for the hospital API.
//!
//! - [`list`] - List hospitals with filtering, projection, sorting and paging
//! - [`read`] - Read a hospital by ID
//! - [`create`] - Create a hospital
//! - [`update`] - Update a hospital
//! - [`delete`] - Delete a hospital and its appointments
//! - [`health`] - Health check endpoints

pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, liveness_handler};
pub use list::list_handler;
pub use read::read_handler;
pub use update::update_handler;
