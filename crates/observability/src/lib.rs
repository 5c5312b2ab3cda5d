//! Tracing/logging setup shared by services and tests.

pub mod tracing;

pub use tracing::{init, init_with_default_filter};
