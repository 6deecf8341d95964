//! Central eviction path used by every write.

mod bus;

pub use bus::InvalidationBus;
