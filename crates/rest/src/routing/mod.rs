//! Route configuration for the VacQ REST API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod hospital_routes;

pub use hospital_routes::create_routes;
