//! Tally gateway library entry.
//!
//! Wires config, app state, the counter routes, ops endpoints and the server
//! lifecycle into the HTTP service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
pub mod transport;
