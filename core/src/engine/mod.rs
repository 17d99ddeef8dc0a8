// trolley_core/src/engine/mod.rs

//! The reconciliation engine: caller intents in, minimal sequences of remote
//! cart primitives out.

pub mod execution;
pub mod intent;
pub mod reconciler;
pub mod view;

pub use intent::{Intent, Outcome};
pub use reconciler::Reconciler;
pub use view::CartView;
