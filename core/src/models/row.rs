// trolley_core/src/models/row.rs

//! The wire model for one cart line item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ActivityId, RowId};

/// Catalog reference some backends embed on the row instead of (or alongside)
/// the flat `activityId` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRef {
  pub id: ActivityId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
}

/// One row in the remote cart collection.
///
/// The referenced activity arrives either as the flat `activityId` field, as
/// an embedded `activity` object, or both; [`CartRow::activity_key`] resolves
/// whichever is present. A payload missing `quantity` deserializes as 0;
/// such a row is already outside the store's own rules, and the engine's next
/// write through it repairs the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRow {
  pub id: RowId,

  #[serde(rename = "activityId", default, skip_serializing_if = "Option::is_none")]
  pub activity_id: Option<ActivityId>,

  #[serde(default)]
  pub quantity: i32,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activity: Option<ActivityRef>,

  #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,

  #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl CartRow {
  /// The activity this row references: the flat id when present, the embedded
  /// object's id otherwise.
  pub fn activity_key(&self) -> Option<&ActivityId> {
    self.activity_id.as_ref().or_else(|| self.activity.as_ref().map(|a| &a.id))
  }

  /// Whether this row references the given activity, under either identity
  /// shape.
  pub fn references(&self, activity: &ActivityId) -> bool {
    self.activity_key() == Some(activity)
  }
}
