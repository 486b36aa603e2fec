//! `autoparts-observability` — process-level logging/tracing setup.

pub mod tracing;
