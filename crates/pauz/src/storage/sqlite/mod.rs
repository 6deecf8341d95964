//! SQLite relational backend.
//!
//! Uses `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping. Serves free journals and garden entries, and answers count and
//! preview queries with SQL (one combined COUNT, `substr` projections).

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
