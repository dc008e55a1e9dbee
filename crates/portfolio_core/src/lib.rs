//! Shared domain primitives for the portfolio units.
//!
//! This crate owns the pure behavior behind every handler: numeral
//! conversion, recipe records, upload decoding, image assessment and
//! language selection. It intentionally excludes AWS SDK, Lambda runtime
//! and HTTP framework concerns.

pub mod analysis;
pub mod language;
pub mod recipe;
pub mod roman;
pub mod upload;
