mod document;
mod error;
mod kind;
mod types;

pub use document::{parse_guided_document, render_guided_document};
pub use error::{JournalError, UnknownResourceKind};
pub use kind::{Backing, ResourceKind};
pub use types::{FreeJournal, GardenEntry, GuidedJournal, GuidedJournalEntry};
