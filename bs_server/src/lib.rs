//! Server library surface, exposed for integration tests.

pub mod api;
pub mod config;
pub mod logging;
