// trolley_core/src/engine/view.rs

//! The engine's caller-visible state: the latest authoritative snapshot plus
//! a busy flag for gating cart controls.

use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::models::Snapshot;

/// A cloneable handle onto the engine's published cart state.
///
/// The snapshot behind this handle is only ever replaced wholesale with the
/// result of a successful list round trip. It is never edited optimistically,
/// so it can diverge from the server only by staleness, never by invention.
///
/// IMPORTANT: the guard returned by [`CartView::read`] is a blocking
/// parking_lot guard and MUST NOT be held across `.await` suspension points.
#[derive(Debug, Default)]
pub struct CartView {
  inner: Arc<ViewInner>,
}

#[derive(Debug, Default)]
struct ViewInner {
  snapshot: RwLock<Snapshot>,
  in_flight: AtomicUsize,
}

impl CartView {
  /// An empty view; it stays empty until the first successful refresh.
  pub fn new() -> Self {
    CartView::default()
  }

  /// An owned clone of the latest installed snapshot.
  pub fn snapshot(&self) -> Snapshot {
    self.inner.snapshot.read().clone()
  }

  /// Read access without cloning. The returned guard MUST be dropped before
  /// any `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
    self.inner.snapshot.read()
  }

  /// Whether any intent is currently mid-sequence. Intents are neither
  /// queued nor coalesced, so several can be in flight at once; this stays
  /// true until the last of them finishes.
  pub fn is_busy(&self) -> bool {
    self.inner.in_flight.load(Ordering::Acquire) > 0
  }

  /// Replaces the published snapshot wholesale.
  pub(crate) fn install(&self, snapshot: Snapshot) {
    *self.inner.snapshot.write() = snapshot;
  }

  /// Brackets one intent: busy while the returned guard lives.
  pub(crate) fn enter_intent(&self) -> BusyGuard {
    self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
    BusyGuard {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl Clone for CartView {
  fn clone(&self) -> Self {
    CartView {
      inner: Arc::clone(&self.inner),
    }
  }
}

/// Decrements the in-flight count on drop, error paths included.
pub(crate) struct BusyGuard {
  inner: Arc<ViewInner>,
}

impl Drop for BusyGuard {
  fn drop(&mut self) {
    self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
  }
}
