//! Core types for stored documents and queries.
//!
//! - [`StoredDocument`] - A document with storage-managed metadata
//! - [`FilterExpression`] - Per-field equality and comparison conditions
//! - [`FindQuery`] - Filter, projection, sort, and paging for a find
//! - [`Projection`] / [`SortDirective`] - Field selection and ordering

pub mod document;
pub mod filter;
pub mod query;

pub use document::{
    CREATED_AT_FIELD, ID_FIELD, METADATA_FIELDS, StoredDocument, UPDATED_AT_FIELD,
    format_timestamp, is_valid_document_id, new_document_id,
};
pub use filter::{Comparison, ComparisonOperator, FieldFilter, FilterExpression, FilterValue};
pub use query::{FieldPath, FindQuery, Projection, SortDirection, SortDirective};
