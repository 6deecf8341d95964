//! Repository decorators that notify the [`InvalidationBus`] after each write.
//!
//! Every write path in the application goes through one of these:
//! - **Reads**: passed straight through to the wrapped repository
//! - **Writes**: persist first, then invalidate only if the write succeeded
//!
//! [`InvalidationBus`]: crate::invalidation::InvalidationBus

mod free_journal;
mod garden;
mod guided_journal;

pub use free_journal::InvalidatingFreeJournalRepository;
pub use garden::InvalidatingGardenRepository;
pub use guided_journal::InvalidatingGuidedJournalRepository;
