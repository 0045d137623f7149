//! `smartstock-observability` — logging setup for binaries and tests.

pub mod tracing;

pub use crate::tracing::init;
