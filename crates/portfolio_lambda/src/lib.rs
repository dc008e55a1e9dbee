//! AWS-oriented adapters and handlers for the serverless portfolio units.
//!
//! Handlers are written against the adapter traits so they can run against
//! in-memory fakes; `adapters::aws` wires the SDK clients used by the
//! Lambda binaries.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod http;
pub mod logging;
