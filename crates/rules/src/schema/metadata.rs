//! Common metadata shared across rule documents.

use serde::{Deserialize, Serialize};

/// Shared metadata block of every rule document.
///
/// The `extends` field enables inheritance: a child profile references a parent
/// by ID and deep-merges the parent's fields, with the child's values winning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommonMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Parent profile ID. The loader deep-merges the parent's document into
    /// this one, with child fields taking precedence.
    #[serde(default)]
    pub extends: Option<String>,
}

pub(crate) fn default_true() -> bool {
    true
}
