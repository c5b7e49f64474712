//! Compatibility scoring and ranking of opportunities against member profiles.
//!
//! The [`matching`] module holds the pure pipeline (`normalize -> score -> rank -> filter`);
//! [`config`], [`telemetry`], and [`error`] carry the ambient service concerns shared with the
//! API binary.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
