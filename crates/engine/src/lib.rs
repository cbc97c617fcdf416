//! Client-side state engine for the project catalog.
//!
//! [`CatalogEngine`] owns the paged slice, the full snapshot used for
//! search, and the pagination controller. Every mutation ends in a
//! reconciling reload, and out-of-order page responses are discarded.

pub mod engine;
pub mod error;
pub mod events;

pub use engine::{CatalogEngine, CatalogView, LoadOutcome, MutationReport, SnapshotOutcome};
pub use error::EngineError;
pub use events::{CatalogEvent, EventBus};
