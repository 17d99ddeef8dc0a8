// trolley_core/src/store/mod.rs

//! The remote-facing side of the crate: the `CartStore` trait the engine
//! drives, the injected `Transport` seam, and the REST-dialect client.

pub mod rest;
pub mod transport;

use async_trait::async_trait;

use crate::error::TrolleyResult;
use crate::models::{ActivityId, CartRow, RowId};

pub use rest::RestCartStore;
pub use transport::{ApiRequest, ApiResponse, Credentials, Method, Transport};

/// The four primitive operations the remote cart collection offers.
///
/// The backend exposes nothing above these: no upsert, no conditional write,
/// no "set quantity for activity". That gap is what the reconciliation
/// engine exists to bridge.
///
/// Implementations perform one fresh round trip per call and report their
/// own 404s honestly as `NotFound`; any idempotent tolerance of a vanished
/// row is the engine's decision, not the store's.
#[async_trait]
pub trait CartStore: Send + Sync + 'static {
  /// The complete current row set, in server order.
  async fn list_rows(&self) -> TrolleyResult<Vec<CartRow>>;

  /// Creates one new row for an activity. The server assigns both the row id
  /// and a default quantity; the caller controls neither.
  async fn add_row(&self, activity: &ActivityId) -> TrolleyResult<CartRow>;

  /// Sets an existing row's quantity. `quantity` must be at least 1.
  async fn set_row_quantity(&self, row: &RowId, quantity: i32) -> TrolleyResult<()>;

  /// Deletes an existing row.
  async fn remove_row(&self, row: &RowId) -> TrolleyResult<()>;
}
