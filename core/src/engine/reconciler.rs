// trolley_core/src/engine/reconciler.rs

//! `Reconciler` construction and accessors. The per-intent call sequences
//! live in `execution.rs`.

use std::sync::Arc;

use crate::engine::view::CartView;
use crate::store::CartStore;

/// Turns caller intents into the minimal sequence of remote cart primitives.
///
/// The engine keeps no row state of its own beyond the published [`CartView`]:
/// every activity-keyed intent re-reads the remote collection before matching,
/// and no row reference is trusted across more than one round trip. The
/// remote collection is shared with other sessions and devices, so the engine
/// tolerates concurrent mutation instead of locking anything.
pub struct Reconciler<S: CartStore> {
  pub(crate) store: Arc<S>,
  pub(crate) view: CartView,
}

impl<S: CartStore> Reconciler<S> {
  /// An engine over the given store, starting from an empty view.
  pub fn new(store: Arc<S>) -> Self {
    Reconciler {
      store,
      view: CartView::new(),
    }
  }

  /// A handle onto the published view. Clones share state with the engine
  /// and with each other.
  pub fn view(&self) -> CartView {
    self.view.clone()
  }

  /// Whether any intent is currently mid-sequence. Meant for disabling cart
  /// controls while work is outstanding; it guards nothing.
  pub fn is_busy(&self) -> bool {
    self.view.is_busy()
  }
}
