// trolley_core/examples/notfound_recovery.rs
//
// The engine does not serialize intents for one activity, so a row can
// vanish between the snapshot that matched it and the write that targets it.
// This example triggers that window on purpose and shows the recovery
// contract: NotFound surfaces, and re-running the same intent converges.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use trolley::{ActivityId, CartRow, CartStore, Reconciler, RowId, TrolleyError, TrolleyResult};

// 1. A store with a rigged window: right after the next list is served,
//    another "session" deletes everything it returned.
#[derive(Default)]
struct RuggedStore {
  rows: Mutex<Vec<CartRow>>,
  next_row: AtomicUsize,
  rug_pull_armed: AtomicBool,
}

impl RuggedStore {
  fn arm_rug_pull(&self) {
    self.rug_pull_armed.store(true, Ordering::SeqCst);
  }
}

#[async_trait]
impl CartStore for RuggedStore {
  async fn list_rows(&self) -> TrolleyResult<Vec<CartRow>> {
    let mut rows = self.rows.lock();
    let served = rows.clone();
    if self.rug_pull_armed.swap(false, Ordering::SeqCst) {
      rows.clear(); // Deleted out from under the caller, post-snapshot
    }
    Ok(served)
  }

  async fn add_row(&self, activity: &ActivityId) -> TrolleyResult<CartRow> {
    let id = self.next_row.fetch_add(1, Ordering::Relaxed) + 1;
    let created = CartRow {
      id: RowId::from(format!("row-{}", id)),
      activity_id: Some(activity.clone()),
      quantity: 1,
      activity: None,
      created_at: None,
      updated_at: None,
    };
    self.rows.lock().push(created.clone());
    Ok(created)
  }

  async fn set_row_quantity(&self, row: &RowId, quantity: i32) -> TrolleyResult<()> {
    let mut rows = self.rows.lock();
    match rows.iter_mut().find(|candidate| candidate.id == *row) {
      Some(target) => {
        target.quantity = quantity;
        Ok(())
      }
      None => Err(TrolleyError::NotFound { row: row.clone() }),
    }
  }

  async fn remove_row(&self, row: &RowId) -> TrolleyResult<()> {
    let mut rows = self.rows.lock();
    let before = rows.len();
    rows.retain(|candidate| candidate.id != *row);
    if rows.len() == before {
      return Err(TrolleyError::NotFound { row: row.clone() });
    }
    Ok(())
  }
}

#[tokio::main]
async fn main() -> Result<(), TrolleyError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- NotFound Recovery Example ---");

  let store = Arc::new(RuggedStore::default());
  let engine = Reconciler::new(Arc::clone(&store));

  // 2. Seed one row the normal way.
  engine.set_exact("act-glacier-walk", 2).await?;
  info!("Seeded: {} row(s).", engine.view().snapshot().len());

  // 3. Arm the race: the next intent's match fetch will see the row, and the
  //    row will be gone by the time the update lands.
  store.arm_rug_pull();

  match engine.set_exact("act-glacier-walk", 5).await {
    Err(TrolleyError::NotFound { row }) => {
      warn!("Row {} vanished mid-sequence; retrying the intent.", row);
    }
    Ok(outcome) => info!("No race this time: {:?}", outcome),
    Err(other) => return Err(other),
  }

  // 4. The retry fetches fresh state, finds no row, and takes the create
  //    path instead. Same intent, different (correct) plan.
  let outcome = engine.set_exact("act-glacier-walk", 5).await?;
  info!("Retry converged: {:?}", outcome);

  let snapshot = engine.view().snapshot();
  assert_eq!(snapshot.len(), 1);
  assert_eq!(
    snapshot.row_for(&ActivityId::from("act-glacier-walk")).map(|row| row.quantity),
    Some(5)
  );

  // 5. Removal of a row someone else already deleted is quietly fine.
  let row_id = snapshot.rows()[0].id.clone();
  store.rows.lock().clear(); // The other session empties the cart
  engine.remove_row(row_id).await?;
  info!("Remove after external delete still reported success.");

  assert!(engine.view().snapshot().is_empty());
  Ok(())
}
