//! Cache backend implementation.
//!
//! The [`Cache`](pauz_core::cache::Cache) trait lives in `pauz_core::cache`;
//! this module provides the process-local backend and its sweeper.

pub mod memory;
mod sweeper;

pub use memory::MemoryCache;
pub use sweeper::{join_sweeper, spawn_sweeper};
