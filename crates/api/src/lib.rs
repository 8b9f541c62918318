//! HTTP API for the Taklifnoma backend.
//!
//! Exposed as a library so integration tests can build the router without
//! spawning the binary.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
