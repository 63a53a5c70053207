//! Filesystem loader for `ThresholdConfig` profiles.
//!
//! Scans the rules directory recursively for YAML documents, resolves
//! `extends` inheritance between them, and serves compiled profiles by id.

mod core;
mod error;
mod extends;

#[cfg(test)]
mod tests;

pub use self::core::ProfileLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
pub use self::extends::{deep_merge, resolve_extends};
