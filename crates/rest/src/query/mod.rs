//! List query construction.
//!
//! Turns the query string of a list request into a [`QueryPlan`]: a filter,
//! an optional projection, sort directives and the page to return.
//!
//! ```text
//! GET /hospitals?region=Central&postalcode[gte]=10200&select=name,tel&sort=-name&page=2&limit=10
//!
//! filter      region = "Central", postalcode >= "10200"
//! projection  name, tel (+ _id)
//! sort        name descending
//! page        2 of size 10 (skip 10)
//! ```

pub mod builder;
pub mod pagination;
pub mod rewrite;

use std::collections::HashMap;

use thiserror::Error;
use vacq_persistence::error::QueryError;

pub use builder::{ListQueryBuilder, QueryPlan};
pub use pagination::{Pagination, parse_leading_int};

/// Raw query parameters of a list request.
pub type QueryParameters = HashMap<String, String>;

/// Control parameters that never become filter conditions.
pub const RESERVED_PARAMETERS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Errors raised while building a list query.
#[derive(Debug, Error)]
pub enum ListQueryError {
    /// A field name, projection or sort key is not valid.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The textual operator rewrite produced unparseable JSON.
    #[error("failed to rewrite filter operators: {0}")]
    Rewrite(#[from] serde_json::Error),
}
