//! In-memory relational backend.
//!
//! Stores free journals and garden entries in HashMaps wrapped in
//! `Arc<RwLock<_>>`, and answers count and preview queries over them. Useful
//! for development and tests where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! repo.availability().set_available(false); // simulate an outage
//! ```

mod repository;

pub use repository::InMemoryRepository;
