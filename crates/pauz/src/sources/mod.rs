//! Backing sources the aggregators read through to on a cache miss.
//!
//! The relational sources are the storage backends themselves (see
//! `crate::storage`); this module holds the object-store side and the
//! routing from resource kind to source.

mod availability;
mod memory_store;
mod object_source;
mod set;

pub use availability::Availability;
pub use memory_store::InMemoryObjectStore;
pub use object_source::ObjectStoreCountSource;
pub use set::SourceSet;
