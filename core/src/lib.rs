// src/lib.rs

//! Trolley: An ASYNC reconciliation engine for row-oriented remote shopping
//! carts.
//!
//! The backend Trolley talks to exposes only row primitives: list the
//! collection, add a row (the server picks its id and default quantity), set
//! a row's quantity, remove a row. There is no upsert and no conditional
//! write. Trolley bridges that gap by turning caller intents into minimal
//! primitive sequences, with:
//!  - A fresh snapshot fetched before every activity-keyed match; no stale
//!    row reference is ever trusted across round trips.
//!  - At most one corrective write after an add.
//!  - Idempotent removal, with vanished-row races surfaced as recoverable
//!    `NotFound` errors instead of being papered over.
//!  - A shared `CartView` replaced only from authoritative list responses,
//!    plus a busy flag for gating cart controls.
//!  - A pluggable `Transport` seam, so the host application's HTTP client
//!    (and its timeout/retry policy) stays in charge of the wire.

// Declare modules according to the planned structure
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

// --- Re-exports for the Public API ---

// Engine types that callers interact with most
pub use crate::engine::{CartView, Intent, Outcome, Reconciler};

// Wire model
pub use crate::models::{ActivityId, ActivityRef, CartRow, RowId, Snapshot};

// The store trait, the REST dialect client, and the transport seam
pub use crate::store::{ApiRequest, ApiResponse, CartStore, Credentials, Method, RestCartStore, Transport};

pub use crate::error::{StoreOp, TrolleyError, TrolleyResult};
