//! SQLite backend implementation.
//!
//! Documents are stored as JSON text in a single `documents` table keyed by
//! collection and id. Filters, sorting and paging are translated into SQL over
//! the JSON1 functions by the [`query_builder`].
//!
//! # Example
//!
//! ```no_run
//! use vacq_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory database
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Initialize the schema
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE documents (
//!     collection TEXT NOT NULL,
//!     id TEXT NOT NULL,
//!     data TEXT NOT NULL,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     PRIMARY KEY (collection, id)
//! );
//! ```

mod backend;
pub mod query_builder;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
