//! Response envelopes for the VacQ REST API.
//!
//! - [`envelope`] - `{ success, ... }` bodies for list and single-record responses

pub mod envelope;

pub use envelope::{DataEnvelope, PageLinks, PageRef, ResultEnvelope};
