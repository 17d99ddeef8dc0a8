// trolley_core/src/error.rs
use anyhow::Error as AnyhowError;
use std::fmt;
use thiserror::Error;

use crate::models::RowId;

/// Which of the four remote primitives an error came out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
  List,
  Add,
  Update,
  Remove,
}

impl StoreOp {
  pub fn as_str(&self) -> &'static str {
    match self {
      StoreOp::List => "list",
      StoreOp::Add => "add",
      StoreOp::Update => "update",
      StoreOp::Remove => "remove",
    }
  }
}

impl fmt::Display for StoreOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum TrolleyError {
  /// The round trip itself failed, or the server answered with a status
  /// outside the ones the dialect gives meaning to. Nothing can be assumed
  /// about remote state after one of these.
  #[error("Transport failure during cart {op}. Source: {source}")]
  Transport {
    op: StoreOp,
    #[source]
    source: AnyhowError,
  },

  /// The addressed row does not exist on the server (HTTP 404). Recoverable:
  /// the row was removed by another actor, and re-running the intent against
  /// a fresh snapshot converges.
  #[error("Cart row '{row}' not found on the server")]
  NotFound { row: RowId },

  /// A quantity the dialect cannot express: row quantities are positive
  /// integers, and absence is modelled by removing the row.
  #[error("Quantity {requested} is not a positive integer")]
  InvalidQuantity { requested: i32 },
}

impl TrolleyError {
  /// True for the vanished-row condition, the one failure callers are
  /// expected to retry rather than report.
  pub fn is_not_found(&self) -> bool {
    matches!(self, TrolleyError::NotFound { .. })
  }
}

pub type TrolleyResult<T, E = TrolleyError> = std::result::Result<T, E>;
