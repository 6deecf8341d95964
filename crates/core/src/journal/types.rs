use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::JournalError;

/// A free-form journal stored in the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeJournal {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Writing session the journal belongs to.
    pub session_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FreeJournal {
    /// Creates a new free journal for a user with a fresh session.
    pub fn new(user_id: Uuid, content: impl Into<String>) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Self {
            id,
            user_id,
            session_id: id.to_string(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the writing session.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Sets the creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Replaces the content and bumps `updated_at`.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Appends a voice transcription to the content, separated by a blank line.
    pub fn append_transcription(&mut self, transcript: &str) -> Result<(), JournalError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(JournalError::EmptyContent);
        }
        if self.content.is_empty() {
            self.content = transcript.to_string();
        } else {
            self.content.push_str("\n\n");
            self.content.push_str(transcript);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// A mood flower planted in the user's garden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: String,
    pub flower_type: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GardenEntry {
    /// Creates a new garden entry, rejecting blank mood or flower type.
    pub fn new(
        user_id: Uuid,
        mood: impl Into<String>,
        flower_type: impl Into<String>,
    ) -> Result<Self, JournalError> {
        let mood = mood.into();
        let flower_type = flower_type.into();
        if mood.trim().is_empty() {
            return Err(JournalError::EmptyGardenField("mood"));
        }
        if flower_type.trim().is_empty() {
            return Err(JournalError::EmptyGardenField("flower_type"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            mood,
            flower_type,
            note: None,
            created_at: Utc::now(),
        })
    }

    /// Sets the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// One answered prompt in a guided journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedJournalEntry {
    pub response: String,
}

/// A topic-driven journal stored as a document in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedJournal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub entries: Vec<GuidedJournalEntry>,
    pub created_at: DateTime<Utc>,
}

impl GuidedJournal {
    /// Creates an empty guided journal for a topic.
    pub fn new(user_id: Uuid, topic: impl Into<String>) -> Result<Self, JournalError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(JournalError::EmptyTopic);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            topic,
            entries: Vec::new(),
            created_at: Utc::now(),
        })
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Adds a response, rejecting blank text.
    pub fn add_entry(&mut self, response: impl Into<String>) -> Result<(), JournalError> {
        let response = response.into();
        if response.trim().is_empty() {
            return Err(JournalError::EmptyContent);
        }
        self.entries.push(GuidedJournalEntry { response });
        Ok(())
    }
}
