//! Routing module
//!
//! Fixed route table for the OTA endpoints.

pub mod matcher;

pub use matcher::{match_route, Route};
