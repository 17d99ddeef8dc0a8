// trolley_core/examples/quantity_stepper.rs

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use trolley::{ActivityId, CartRow, CartStore, Outcome, Reconciler, RowId, TrolleyError, TrolleyResult};

// 1. A stand-in backend: the same four primitives a real cart API offers,
//    kept in memory so the example runs without a network.
#[derive(Default)]
struct DemoStore {
  rows: Mutex<Vec<CartRow>>,
  next_row: AtomicUsize,
}

#[async_trait]
impl CartStore for DemoStore {
  async fn list_rows(&self) -> TrolleyResult<Vec<CartRow>> {
    Ok(self.rows.lock().clone())
  }

  async fn add_row(&self, activity: &ActivityId) -> TrolleyResult<CartRow> {
    let id = self.next_row.fetch_add(1, Ordering::Relaxed) + 1;
    let created = CartRow {
      id: RowId::from(format!("row-{}", id)),
      activity_id: Some(activity.clone()),
      quantity: 1, // The server picks the default, not the caller
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

  info!("--- Quantity Stepper Example ---");

  // 2. One engine over the store. The view handle can be cloned off to
  //    whatever renders the cart.
  let engine = Reconciler::new(Arc::new(DemoStore::default()));
  let view = engine.view();

  // 3. Initial load.
  engine.refresh().await?;
  info!("Cart starts with {} rows.", view.snapshot().len());

  // 4. "Add to cart" twice from a product page: deltas accumulate.
  engine.add_delta("act-volcano-tour", 1).await?;
  let outcome = engine.add_delta("act-volcano-tour", 2).await?;
  info!("After two adds: {:?}", outcome);

  // 5. The cart page stepper sets an exact quantity.
  let outcome = engine.set_exact("act-volcano-tour", 10).await?;
  info!("Stepper pinned the quantity: {:?}", outcome);

  // 6. A second activity, exact from the start. Asking for 3 costs two
  //    writes: the add (server default 1) plus one correction.
  engine.set_exact("act-reef-dive", 3).await?;

  // 7. Direct row edit, the way a stepper wired to a known row works.
  let reef = ActivityId::from("act-reef-dive");
  if let Some(row) = view.snapshot().row_for(&reef).map(|row| row.id.clone()) {
    engine.set_row(row, 4).await?;
  }

  // 8. Setting a quantity to zero removes the row entirely.
  let outcome = engine.set_exact("act-volcano-tour", 0).await?;
  info!("Zero means gone: {:?}", outcome);

  // 9. The view always shows the last authoritative listing.
  let snapshot = view.snapshot();
  info!("Final cart ({} rows, {} units):", snapshot.len(), snapshot.total_quantity());
  for row in snapshot.rows() {
    info!("- {:>8} x{}", row.id.to_string(), row.quantity);
  }

  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot.total_quantity(), 4);
  match engine.set_exact("act-reef-dive", 0).await? {
    Outcome::Removed { .. } => info!("Cart emptied."),
    other => info!("Unexpected end state: {:?}", other),
  }

  Ok(())
}
