// trolley_core/src/models/ids.rs

//! Opaque identifiers for cart rows and catalog activities.
//!
//! Both are server-assigned strings. This crate compares them for equality
//! and nothing else; no format is assumed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of one cart row, stable for the row's lifetime. Never reused
/// for the same activity across a remove/add cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
  pub fn new(id: impl Into<String>) -> Self {
    RowId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for RowId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for RowId {
  fn from(id: &str) -> Self {
    RowId(id.to_string())
  }
}

impl From<String> for RowId {
  fn from(id: String) -> Self {
    RowId(id)
  }
}

/// Identifier of the catalog activity a cart row references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
  pub fn new(id: impl Into<String>) -> Self {
    ActivityId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ActivityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ActivityId {
  fn from(id: &str) -> Self {
    ActivityId(id.to_string())
  }
}

impl From<String> for ActivityId {
  fn from(id: String) -> Self {
    ActivityId(id)
  }
}
