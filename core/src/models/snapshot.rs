// trolley_core/src/models/snapshot.rs

//! The full row set from one list round trip, plus the matching rule the
//! engine applies to it.

use std::collections::HashMap;

use super::ids::ActivityId;
use super::row::CartRow;

/// Every row the server returned from the most recent list call.
///
/// Row order is the server's. The engine relies on it for exactly one thing:
/// when an activity is (transiently) referenced by more than one row, the
/// first row in this order is the one that gets mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
  rows: Vec<CartRow>,
}

impl Snapshot {
  pub fn new(rows: Vec<CartRow>) -> Self {
    Snapshot { rows }
  }

  pub fn rows(&self) -> &[CartRow] {
    &self.rows
  }

  pub fn into_rows(self) -> Vec<CartRow> {
    self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// The row for an activity: the first row referencing it, in server order.
  /// Later matches, when any exist, are deliberately not considered.
  pub fn row_for(&self, activity: &ActivityId) -> Option<&CartRow> {
    self.rows.iter().find(|row| row.references(activity))
  }

  /// Every row referencing an activity, in server order.
  pub fn rows_for<'a>(&'a self, activity: &'a ActivityId) -> impl Iterator<Item = &'a CartRow> + 'a {
    self.rows.iter().filter(move |row| row.references(activity))
  }

  /// Activities referenced by more than one row. These are reported for
  /// diagnostics only; the engine mutates the first match and leaves the
  /// rest alone.
  pub fn duplicate_activities(&self) -> Vec<ActivityId> {
    let mut counts: HashMap<&ActivityId, usize> = HashMap::new();
    for row in &self.rows {
      if let Some(key) = row.activity_key() {
        *counts.entry(key).or_insert(0) += 1;
      }
    }
    let mut duplicates: Vec<ActivityId> = counts
      .into_iter()
      .filter(|(_, refs)| *refs > 1)
      .map(|(key, _)| key.clone())
      .collect();
    // Stable order for logs and assertions.
    duplicates.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    duplicates
  }

  /// Sum of all row quantities, the number a cart badge would show.
  pub fn total_quantity(&self) -> i64 {
    self.rows.iter().map(|row| i64::from(row.quantity)).sum()
  }
}

impl From<Vec<CartRow>> for Snapshot {
  fn from(rows: Vec<CartRow>) -> Self {
    Snapshot::new(rows)
  }
}
