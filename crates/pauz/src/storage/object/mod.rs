//! Guided journals persisted as documents in the object store.

mod guided;

pub use guided::ObjectStoreGuidedJournals;
