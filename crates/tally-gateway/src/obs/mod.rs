//! Lightweight in-process metrics.
//!
//! Stored as atomics and rendered by the `/metrics` handler in Prometheus
//! text format. `track` feeds the per-route gauge and histogram.

pub mod metrics;
pub mod track;
