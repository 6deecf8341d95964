//! Functional core for the pauz journaling backend's stats and preview cache.
//!
//! Everything in this crate is pure: key encoding, pattern matching, merge and
//! ordering rules, plus the trait seams the imperative shell implements.

pub mod cache;
pub mod journal;
pub mod preview;
pub mod sources;
pub mod stats;
pub mod storage;
