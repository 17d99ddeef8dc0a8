// trolley_core/src/engine/intent.rs

//! Caller intents, and the end states reconciliation reports back.

use crate::models::{ActivityId, RowId};

/// One caller-level request against the cart.
///
/// The activity-keyed intents (`SetExact`, `AddDelta`) are matched against a
/// freshly fetched snapshot before any write is chosen. The row-keyed ones
/// (`SetRow`, `RemoveRow`) trust the caller's row id and go straight to the
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
  /// Make the activity's row show exactly `quantity`. Non-positive values
  /// mean "make the row absent".
  SetExact { activity: ActivityId, quantity: i32 },

  /// Put `delta` more units on top of whatever the activity currently has.
  /// Non-positive deltas are a complete no-op.
  AddDelta { activity: ActivityId, delta: i32 },

  /// Set a known row's quantity directly; `quantity` must be at least 1.
  /// Deleting through zero is deliberately not offered here, route removal
  /// through `SetExact` or `RemoveRow` instead.
  SetRow { row: RowId, quantity: i32 },

  /// Delete a known row. A row that is already gone counts as success.
  RemoveRow { row: RowId },
}

impl Intent {
  /// Stable label for tracing fields.
  pub fn kind(&self) -> &'static str {
    match self {
      Intent::SetExact { .. } => "set_exact",
      Intent::AddDelta { .. } => "add_delta",
      Intent::SetRow { .. } => "set_row",
      Intent::RemoveRow { .. } => "remove_row",
    }
  }
}

/// What an intent converged to.
///
/// Mutating intents report only after their trailing refresh, so by the time
/// the caller sees one of these the view already reflects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// Nothing needed doing: a no-op delta, or removing what was already
  /// absent from the snapshot.
  Unchanged,

  /// An existing row was set to `quantity`.
  Set { row: RowId, quantity: i32 },

  /// A new row was created. `quantity` is its final value: the server's add
  /// default, or the corrected total when a follow-up write was required.
  Created { row: RowId, quantity: i32 },

  /// The row is gone, whether removed by this intent or already missing on
  /// the server.
  Removed { row: RowId },
}
