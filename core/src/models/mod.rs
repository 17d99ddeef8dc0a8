// trolley_core/src/models/mod.rs

//! Data structures for the remote cart: identifiers, line rows, and the
//! snapshot type the engine matches against.

pub mod ids;
pub mod row;
pub mod snapshot;

pub use ids::{ActivityId, RowId};
pub use row::{ActivityRef, CartRow};
pub use snapshot::Snapshot;
