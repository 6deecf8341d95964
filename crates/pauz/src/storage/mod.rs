//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `pauz_core::storage`, plus the invalidating decorators every write goes
//! through. The relational backend is selected at compile time.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): relational data in process memory
//! - `sqlite`: SQLite relational backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive. Guided journals always live in the
//! object store.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p pauz --no-default-features --features sqlite
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p pauz --features sqlite"
);

// Test fixtures use it under every backend.
#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod invalidating;
pub mod object;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

pub use invalidating::{
    InvalidatingFreeJournalRepository, InvalidatingGardenRepository,
    InvalidatingGuidedJournalRepository,
};
pub use object::ObjectStoreGuidedJournals;
