// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Barrier;
use tracing::Level;

use trolley::{
  ActivityId, ActivityRef, ApiRequest, ApiResponse, CartRow, CartStore, RowId, StoreOp, Transport, TrolleyError,
  TrolleyResult,
};

// --- Row builders ---

pub fn act(id: &str) -> ActivityId {
  ActivityId::from(id)
}

pub fn rid(id: &str) -> RowId {
  RowId::from(id)
}

/// A row carrying the activity as the flat `activityId` field.
pub fn row(id: &str, activity: &str, quantity: i32) -> CartRow {
  CartRow {
    id: RowId::from(id),
    activity_id: Some(ActivityId::from(activity)),
    quantity,
    activity: None,
    created_at: None,
    updated_at: None,
  }
}

/// A row carrying the activity only as the embedded object, the other
/// identity shape the backend produces.
pub fn nested_row(id: &str, activity: &str, quantity: i32) -> CartRow {
  CartRow {
    id: RowId::from(id),
    activity_id: None,
    quantity,
    activity: Some(ActivityRef {
      id: ActivityId::from(activity),
      title: Some(format!("Activity {}", activity)),
    }),
    created_at: None,
    updated_at: None,
  }
}

// --- Call journal ---

/// One recorded store call, with the arguments that matter for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
  List,
  Add(ActivityId),
  Update(RowId, i32),
  Remove(RowId),
}

impl StoreCall {
  pub fn op(&self) -> StoreOp {
    match self {
      StoreCall::List => StoreOp::List,
      StoreCall::Add(_) => StoreOp::Add,
      StoreCall::Update(_, _) => StoreOp::Update,
      StoreCall::Remove(_) => StoreOp::Remove,
    }
  }
}

// --- In-memory store fake ---

#[derive(Default)]
struct MemoryState {
  rows: Vec<CartRow>,
  next_row: usize,
  default_quantity: i32,
  journal: Vec<StoreCall>,
  planned_failures: Vec<(StoreOp, String)>,
  delete_after_next_list: Option<RowId>,
  vanish_next_add: bool,
}

/// An in-memory `CartStore` with the same observable contract as the REST
/// client: server-assigned ids, a default quantity on add, `NotFound` for
/// vanished rows, and rejection of non-positive quantities.
///
/// Tests can script faults (one-shot transport failures per operation, a row
/// deleted "by someone else" right after a list, a created row vanishing
/// immediately) and can park list calls on a barrier to force a specific
/// interleaving of concurrent intents.
pub struct MemoryCartStore {
  state: Mutex<MemoryState>,
  list_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryCartStore {
  pub fn new() -> Arc<Self> {
    Self::with_rows(Vec::new())
  }

  pub fn with_rows(rows: Vec<CartRow>) -> Arc<Self> {
    Arc::new(MemoryCartStore {
      state: Mutex::new(MemoryState {
        rows,
        next_row: 0,
        default_quantity: 1,
        journal: Vec::new(),
        planned_failures: Vec::new(),
        delete_after_next_list: None,
        vanish_next_add: false,
      }),
      list_barrier: Mutex::new(None),
    })
  }

  /// Current server-side truth.
  pub fn rows(&self) -> Vec<CartRow> {
    self.state.lock().rows.clone()
  }

  /// Every call made so far, in order.
  pub fn journal(&self) -> Vec<StoreCall> {
    self.state.lock().journal.clone()
  }

  /// How many calls hit the given operation.
  pub fn count(&self, op: StoreOp) -> usize {
    self.state.lock().journal.iter().filter(|call| call.op() == op).count()
  }

  /// How many calls were writes (everything except list).
  pub fn mutation_count(&self) -> usize {
    self
      .state
      .lock()
      .journal
      .iter()
      .filter(|call| call.op() != StoreOp::List)
      .count()
  }

  /// The quantity the server assigns to newly added rows.
  pub fn set_default_quantity(&self, quantity: i32) {
    self.state.lock().default_quantity = quantity;
  }

  /// The next call for `op` fails with a transport error carrying `message`.
  pub fn plan_failure(&self, op: StoreOp, message: &str) {
    self.state.lock().planned_failures.push((op, message.to_string()));
  }

  /// After the next list call has served its (pre-deletion) rows, the given
  /// row disappears, as if another session removed it.
  pub fn delete_row_after_next_list(&self, row: RowId) {
    self.state.lock().delete_after_next_list = Some(row);
  }

  /// The next added row is removed again before anyone can see it.
  pub fn vanish_next_add(&self) {
    self.state.lock().vanish_next_add = true;
  }

  /// Another actor drops a row in behind the engine's back.
  pub fn insert_row(&self, row: CartRow) {
    self.state.lock().rows.push(row);
  }

  /// Park every list call on a barrier of `parties` until all arrive. The
  /// returned handle lets the test itself act as one of the parties.
  pub fn pause_lists(&self, parties: usize) -> Arc<Barrier> {
    let barrier = Arc::new(Barrier::new(parties));
    *self.list_barrier.lock() = Some(Arc::clone(&barrier));
    barrier
  }

  /// Lists stop waiting on the barrier from now on.
  pub fn unpause_lists(&self) {
    *self.list_barrier.lock() = None;
  }
}

fn take_planned(state: &mut MemoryState, op: StoreOp) -> Option<String> {
  let position = state.planned_failures.iter().position(|(planned, _)| *planned == op)?;
  Some(state.planned_failures.remove(position).1)
}

fn transport_failure(op: StoreOp, message: String) -> TrolleyError {
  TrolleyError::Transport {
    op,
    source: anyhow::anyhow!(message),
  }
}

#[async_trait]
impl CartStore for MemoryCartStore {
  async fn list_rows(&self) -> TrolleyResult<Vec<CartRow>> {
    let (rows, barrier) = {
      let mut state = self.state.lock();
      state.journal.push(StoreCall::List);
      if let Some(message) = take_planned(&mut state, StoreOp::List) {
        return Err(transport_failure(StoreOp::List, message));
      }
      let rows = state.rows.clone();
      if let Some(victim) = state.delete_after_next_list.take() {
        state.rows.retain(|row| row.id != victim);
      }
      (rows, self.list_barrier.lock().clone())
    };
    // The guard is gone before this await.
    if let Some(barrier) = barrier {
      barrier.wait().await;
    }
    Ok(rows)
  }

  async fn add_row(&self, activity: &ActivityId) -> TrolleyResult<CartRow> {
    let mut state = self.state.lock();
    state.journal.push(StoreCall::Add(activity.clone()));
    if let Some(message) = take_planned(&mut state, StoreOp::Add) {
      return Err(transport_failure(StoreOp::Add, message));
    }
    state.next_row += 1;
    let created = CartRow {
      id: RowId::from(format!("row-{}", state.next_row)),
      activity_id: Some(activity.clone()),
      quantity: state.default_quantity,
      activity: None,
      created_at: None,
      updated_at: None,
    };
    if state.vanish_next_add {
      state.vanish_next_add = false;
    } else {
      state.rows.push(created.clone());
    }
    Ok(created)
  }

  async fn set_row_quantity(&self, row: &RowId, quantity: i32) -> TrolleyResult<()> {
    let mut state = self.state.lock();
    state.journal.push(StoreCall::Update(row.clone(), quantity));
    if let Some(message) = take_planned(&mut state, StoreOp::Update) {
      return Err(transport_failure(StoreOp::Update, message));
    }
    if quantity < 1 {
      return Err(TrolleyError::InvalidQuantity { requested: quantity });
    }
    match state.rows.iter_mut().find(|candidate| candidate.id == *row) {
      Some(target) => {
        target.quantity = quantity;
        Ok(())
      }
      None => Err(TrolleyError::NotFound { row: row.clone() }),
    }
  }

  async fn remove_row(&self, row: &RowId) -> TrolleyResult<()> {
    let mut state = self.state.lock();
    state.journal.push(StoreCall::Remove(row.clone()));
    if let Some(message) = take_planned(&mut state, StoreOp::Remove) {
      return Err(transport_failure(StoreOp::Remove, message));
    }
    let before = state.rows.len();
    state.rows.retain(|candidate| candidate.id != *row);
    if state.rows.len() == before {
      return Err(TrolleyError::NotFound { row: row.clone() });
    }
    Ok(())
  }
}

// --- Scripted transport for REST dialect tests ---

/// Serves canned responses in push order and records every request it saw.
pub struct ScriptedTransport {
  responses: Mutex<VecDeque<anyhow::Result<ApiResponse>>>,
  seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
  pub fn new() -> Arc<Self> {
    Arc::new(ScriptedTransport {
      responses: Mutex::new(VecDeque::new()),
      seen: Mutex::new(Vec::new()),
    })
  }

  pub fn push_ok(&self, status: u16, body: impl Into<String>) {
    self.responses.lock().push_back(Ok(ApiResponse::new(status, body)));
  }

  pub fn push_err(&self, message: &str) {
    self.responses.lock().push_back(Err(anyhow::anyhow!(message.to_string())));
  }

  pub fn requests(&self) -> Vec<ApiRequest> {
    self.seen.lock().clone()
  }
}

#[async_trait]
impl Transport for ScriptedTransport {
  async fn send(&self, request: ApiRequest) -> anyhow::Result<ApiResponse> {
    self.seen.lock().push(request);
    match self.responses.lock().pop_front() {
      Some(response) => response,
      None => panic!("ScriptedTransport ran out of scripted responses"),
    }
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
