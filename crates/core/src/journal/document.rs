//! Plain-text document format for guided journals in the object store.
//!
//! The first block is the topic; every following block is one response.
//! Blocks are separated by a blank line, so the stored body starts with
//! readable text and a byte-prefix read yields a meaningful preview.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{GuidedJournal, GuidedJournalEntry};

const BLOCK_SEPARATOR: &str = "\n\n";

/// Collapses a response so it cannot contain a block separator.
fn normalize_block(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a guided journal into its stored document body.
pub fn render_guided_document(journal: &GuidedJournal) -> String {
    let topic = journal.topic.lines().collect::<Vec<_>>().join(" ");
    let mut blocks = vec![topic.trim().to_string()];
    blocks.extend(
        journal
            .entries
            .iter()
            .map(|entry| normalize_block(&entry.response))
            .filter(|block| !block.is_empty()),
    );
    blocks.join(BLOCK_SEPARATOR)
}

/// Parses a stored document body back into a guided journal.
///
/// Identity and timestamps live in the object key and metadata, not in the body.
pub fn parse_guided_document(
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    body: &str,
) -> GuidedJournal {
    let mut blocks = body.split(BLOCK_SEPARATOR);
    let topic = blocks.next().unwrap_or_default().trim().to_string();
    let entries = blocks
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| GuidedJournalEntry {
            response: block.to_string(),
        })
        .collect();

    GuidedJournal {
        id,
        user_id,
        topic,
        entries,
        created_at,
    }
}
