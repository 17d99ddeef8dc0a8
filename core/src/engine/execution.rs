// trolley_core/src/engine/execution.rs

//! `Reconciler::apply` and the per-intent reconciliation sequences.
//!
//! Every mutating sequence has the same shape: fetch a fresh snapshot when
//! the intent is activity-keyed, perform the minimal writes, then one full
//! refresh so the published view shows authoritative post-write state. A
//! remote failure aborts the sequence where it stands and leaves the view on
//! its last successful install.

use tracing::{event, instrument, Level};

use crate::engine::intent::{Intent, Outcome};
use crate::engine::reconciler::Reconciler;
use crate::error::{TrolleyError, TrolleyResult};
use crate::models::{ActivityId, CartRow, RowId, Snapshot};
use crate::store::CartStore;

impl<S: CartStore> Reconciler<S> {
  /// Runs one intent to completion and reports what it converged to.
  ///
  /// The busy flag is raised for the whole sequence, error paths included.
  /// Concurrent `apply` calls are allowed and are not serialized; two
  /// in-flight intents for the same activity can interleave their fetch and
  /// write phases, and the loser of that race surfaces as `NotFound` or as a
  /// transiently duplicated row in the next snapshot.
  #[instrument(
        name = "Reconciler::apply",
        skip_all,
        fields(intent = intent.kind()),
        err(Display)
    )]
  pub async fn apply(&self, intent: Intent) -> TrolleyResult<Outcome> {
    let _busy = self.view.enter_intent();
    event!(Level::DEBUG, "Intent accepted.");

    let outcome = match intent {
      Intent::SetExact { activity, quantity } => self.run_set_exact(&activity, quantity).await?,
      Intent::AddDelta { activity, delta } => self.run_add_delta(&activity, delta).await?,
      Intent::SetRow { row, quantity } => self.run_set_row(&row, quantity).await?,
      Intent::RemoveRow { row } => self.run_remove_row(&row).await?,
    };

    event!(Level::INFO, outcome = ?outcome, "Intent reconciled.");
    Ok(outcome)
  }

  /// Convenience for [`Intent::SetExact`].
  pub async fn set_exact(&self, activity: impl Into<ActivityId>, quantity: i32) -> TrolleyResult<Outcome> {
    self
      .apply(Intent::SetExact {
        activity: activity.into(),
        quantity,
      })
      .await
  }

  /// Convenience for [`Intent::AddDelta`].
  pub async fn add_delta(&self, activity: impl Into<ActivityId>, delta: i32) -> TrolleyResult<Outcome> {
    self
      .apply(Intent::AddDelta {
        activity: activity.into(),
        delta,
      })
      .await
  }

  /// Convenience for [`Intent::SetRow`].
  pub async fn set_row(&self, row: impl Into<RowId>, quantity: i32) -> TrolleyResult<Outcome> {
    self.apply(Intent::SetRow { row: row.into(), quantity }).await
  }

  /// Convenience for [`Intent::RemoveRow`].
  pub async fn remove_row(&self, row: impl Into<RowId>) -> TrolleyResult<Outcome> {
    self.apply(Intent::RemoveRow { row: row.into() }).await
  }

  /// One full list round trip, installing the result as the new view.
  ///
  /// For initial load and explicit pull-to-refresh; intents refresh on their
  /// own and do not need this called around them.
  #[instrument(name = "Reconciler::refresh", skip_all, err(Display))]
  pub async fn refresh(&self) -> TrolleyResult<Snapshot> {
    self.fetch_snapshot().await
  }

  // --- Intent sequences ---

  async fn run_set_exact(&self, activity: &ActivityId, quantity: i32) -> TrolleyResult<Outcome> {
    let snapshot = self.fetch_snapshot().await?;
    let existing = self.match_row(&snapshot, activity).cloned();

    // "Exactly none": remove the row if there is one, otherwise done.
    if quantity <= 0 {
      match existing {
        Some(row) => {
          self.remove_tolerant(&row.id).await?;
          self.fetch_snapshot().await?;
          return Ok(Outcome::Removed { row: row.id });
        }
        None => {
          event!(Level::DEBUG, %activity, "No row to remove; nothing to do.");
          return Ok(Outcome::Unchanged);
        }
      }
    }

    if let Some(row) = existing {
      self.store.set_row_quantity(&row.id, quantity).await?;
      self.fetch_snapshot().await?;
      return Ok(Outcome::Set { row: row.id, quantity });
    }

    // No row yet: create one, then correct the server-assigned default when
    // the caller wants more than a single unit.
    let created = self.store.add_row(activity).await?;
    let outcome = if quantity > 1 {
      self.correct_new_row(activity, created, quantity).await?
    } else {
      Outcome::Created {
        quantity: created.quantity,
        row: created.id,
      }
    };
    self.fetch_snapshot().await?;
    Ok(outcome)
  }

  async fn run_add_delta(&self, activity: &ActivityId, delta: i32) -> TrolleyResult<Outcome> {
    // Stepper decrements and zero-clicks never reach the wire.
    if delta <= 0 {
      event!(Level::DEBUG, %activity, delta, "Non-positive delta; nothing to do.");
      return Ok(Outcome::Unchanged);
    }

    let snapshot = self.fetch_snapshot().await?;
    if let Some(row) = self.match_row(&snapshot, activity).cloned() {
      // Accumulate onto the quantity just observed, never onto a cached one.
      let total = row.quantity.saturating_add(delta);
      self.store.set_row_quantity(&row.id, total).await?;
      self.fetch_snapshot().await?;
      return Ok(Outcome::Set {
        row: row.id,
        quantity: total,
      });
    }

    // The first unit comes from the server's add default; the rest, when
    // there are any, from the corrective follow-up.
    let created = self.store.add_row(activity).await?;
    let outcome = if delta > 1 {
      self.correct_new_row(activity, created, delta).await?
    } else {
      Outcome::Created {
        quantity: created.quantity,
        row: created.id,
      }
    };
    self.fetch_snapshot().await?;
    Ok(outcome)
  }

  async fn run_set_row(&self, row: &RowId, quantity: i32) -> TrolleyResult<Outcome> {
    if quantity < 1 {
      return Err(TrolleyError::InvalidQuantity { requested: quantity });
    }
    self.store.set_row_quantity(row, quantity).await?;
    self.fetch_snapshot().await?;
    Ok(Outcome::Set { row: row.clone(), quantity })
  }

  async fn run_remove_row(&self, row: &RowId) -> TrolleyResult<Outcome> {
    self.remove_tolerant(row).await?;
    // The row is gone either way; the view still gets its refresh.
    self.fetch_snapshot().await?;
    Ok(Outcome::Removed { row: row.clone() })
  }

  // --- Shared phases ---

  /// One list round trip. Success replaces the published view wholesale; a
  /// failure leaves it untouched.
  #[instrument(name = "Reconciler::fetch_snapshot", skip_all, err(Display))]
  async fn fetch_snapshot(&self) -> TrolleyResult<Snapshot> {
    let rows = self.store.list_rows().await?;
    let snapshot = Snapshot::new(rows);
    event!(Level::DEBUG, rows = snapshot.len(), "Snapshot fetched.");
    self.view.install(snapshot.clone());
    Ok(snapshot)
  }

  /// The row for an activity under the first-match rule, with the
  /// more-than-one-row observation logged when it holds.
  fn match_row<'a>(&self, snapshot: &'a Snapshot, activity: &ActivityId) -> Option<&'a CartRow> {
    let matches = snapshot.rows_for(activity).count();
    if matches > 1 {
      event!(
        Level::WARN,
        %activity,
        matches,
        "Multiple rows reference one activity; mutating the first and leaving the rest."
      );
    }
    snapshot.row_for(activity)
  }

  /// Removes a row, treating one that is already gone as success.
  async fn remove_tolerant(&self, row: &RowId) -> TrolleyResult<()> {
    match self.store.remove_row(row).await {
      Ok(()) => Ok(()),
      Err(TrolleyError::NotFound { .. }) => {
        event!(Level::WARN, %row, "Row was already gone when removed; treating as success.");
        Ok(())
      }
      Err(other) => Err(other),
    }
  }

  /// After an add, the returned row's quantity is provisional. Re-fetch,
  /// locate the activity's row again, and set the intended total.
  ///
  /// A row that cannot be found on the re-fetch was removed concurrently;
  /// the follow-up is skipped and the provisional outcome reported as-is.
  async fn correct_new_row(&self, activity: &ActivityId, created: CartRow, quantity: i32) -> TrolleyResult<Outcome> {
    let snapshot = self.fetch_snapshot().await?;
    match self.match_row(&snapshot, activity).cloned() {
      Some(row) => {
        self.store.set_row_quantity(&row.id, quantity).await?;
        Ok(Outcome::Created { row: row.id, quantity })
      }
      None => {
        event!(
          Level::WARN,
          %activity,
          row = %created.id,
          "Created row vanished before its quantity correction; leaving as-is."
        );
        Ok(Outcome::Created {
          quantity: created.quantity,
          row: created.id,
        })
      }
    }
  }
}
