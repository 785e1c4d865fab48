//! VacQ Persistence Layer
//!
//! This crate stores the documents of the VacQ service (hospitals and their
//! appointments) and answers the filtered, sorted and paged queries the REST
//! layer builds.
//!
//! # Architecture
//!
//! - [`types`] - Stored documents, filter expressions, projections and sorts
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits ([`core::DocumentStorage`], [`core::CascadingStorage`])
//! - [`backends`] - Backend implementations
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Quick Start
//!
//! ```no_run
//! use vacq_persistence::types::{FilterExpression, ComparisonOperator, FindQuery, SortDirective};
//!
//! // Hospitals in the central region with a postal code above 10200,
//! // newest first, second page of 25.
//! let filter = FilterExpression::new()
//!     .eq("region", "Central")
//!     .compare("postalcode", ComparisonOperator::Gt, "10200");
//!
//! let query = FindQuery::new()
//!     .with_filter(filter)
//!     .with_sort(SortDirective::desc("createdAt"))
//!     .with_skip(25)
//!     .with_limit(25);
//!
//! assert_eq!(query.skip, 25);
//! ```

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
