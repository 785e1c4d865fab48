//! Core storage traits and abstractions.
//!
//! ```text
//! DocumentStorage
//!     └── CascadingStorage
//! ```
//!
//! [`DocumentStorage`] provides the per-collection create/read/update/delete,
//! count, and find operations. [`CascadingStorage`] adds an atomic delete of a
//! document together with the documents that reference it.

pub mod storage;

pub use storage::{CascadeDeleteResult, CascadingStorage, DependentRelation, DocumentStorage};
