//! Shared rule-document schema pieces.

mod metadata;

pub use metadata::*;

/// Only `apiVersion` understood by this crate.
pub const API_VERSION: &str = "v1";
