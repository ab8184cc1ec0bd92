//! HTTP transport: counter routes, CORS and error mapping.

pub mod cors;
pub mod error;
pub mod http;
