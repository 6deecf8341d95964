//! SQLite repository implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use pauz_core::journal::{FreeJournal, GardenEntry, ResourceKind};
use pauz_core::preview::{PreviewFilters, PreviewRow, PREVIEW_FETCH_CHARS};
use pauz_core::sources::{CountSource, SourceError, SourceResult};
use pauz_core::storage::{FreeJournalRepository, GardenRepository, RepositoryError, Result};

use super::conversions::{format_datetime, row_to_free_journal, row_to_garden_entry, row_to_preview};
use super::error::{map_source_error, map_tokio_rusqlite_error_with_id, SOURCE_NAME};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Fails the closure with `QueryReturnedNoRows` when nothing was affected.
fn require_affected(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// Escapes LIKE wildcards so the term matches literally under `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SQLite-based relational store for free journals and garden entries.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn preview_query(
        &self,
        query: &'static str,
        user_id: Uuid,
        filters: &PreviewFilters,
    ) -> SourceResult<Vec<PreviewRow>> {
        let user_id_str = user_id.to_string();
        let fetch_chars = PREVIEW_FETCH_CHARS as i64;
        let limit = filters.limit() as i64;
        let start = filters.start_date().map(|dt| format_datetime(&dt));
        let end = filters.end_date().map(|dt| format_datetime(&dt));
        let search = filters.search().map(escape_like);
        let order = filters.order().as_str();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(query).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![
                            user_id_str,
                            fetch_chars,
                            limit,
                            start,
                            end,
                            search,
                            order
                        ],
                        row_to_preview,
                    )
                    .map_err(wrap_err)?;

                let mut previews = Vec::new();
                for row_result in rows {
                    previews.push(row_result.map_err(wrap_err)?);
                }
                Ok(previews)
            })
            .await
            .map_err(map_source_error)
    }

    async fn count_query(&self, query: &'static str, user_id: Uuid) -> SourceResult<u64> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let count: i64 = conn
                    .query_row(query, [&user_id_str], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(count as u64)
            })
            .await
            .map_err(map_source_error)
    }
}

// ============================================================================
// FreeJournalRepository implementation
// ============================================================================

#[async_trait]
impl FreeJournalRepository for SqliteRepository {
    async fn get_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<Option<FreeJournal>> {
        let id_str = id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_FREE_JOURNAL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str, &user_id_str], row_to_free_journal) {
                    Ok(journal) => Ok(Some(journal)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FreeJournal", id.to_string()))
    }

    async fn create_free_journal(&self, journal: &FreeJournal) -> Result<()> {
        let id = journal.id.to_string();
        let user_id = journal.user_id.to_string();
        let session_id = journal.session_id.clone();
        let content = journal.content.clone();
        let created_at = format_datetime(&journal.created_at);
        let updated_at = format_datetime(&journal.updated_at);
        let journal_id = journal.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_FREE_JOURNAL,
                    rusqlite::params![id, user_id, session_id, content, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FreeJournal", journal_id))
    }

    async fn update_free_journal(&self, journal: &FreeJournal) -> Result<()> {
        let id = journal.id.to_string();
        let user_id = journal.user_id.to_string();
        let session_id = journal.session_id.clone();
        let content = journal.content.clone();
        let updated_at = format_datetime(&journal.updated_at);
        let journal_id = journal.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_FREE_JOURNAL,
                        rusqlite::params![id, user_id, session_id, content, updated_at],
                    )
                    .map_err(wrap_err)?;
                require_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FreeJournal", journal_id))
    }

    async fn delete_free_journal(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_FREE_JOURNAL, [&id_str, &user_id_str])
                    .map_err(wrap_err)?;
                require_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FreeJournal", id.to_string()))
    }
}

// ============================================================================
// GardenRepository implementation
// ============================================================================

#[async_trait]
impl GardenRepository for SqliteRepository {
    async fn get_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<Option<GardenEntry>> {
        let id_str = id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_GARDEN_ENTRY)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str, &user_id_str], row_to_garden_entry) {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GardenEntry", id.to_string()))
    }

    async fn create_garden_entry(&self, entry: &GardenEntry) -> Result<()> {
        let id = entry.id.to_string();
        let user_id = entry.user_id.to_string();
        let mood = entry.mood.clone();
        let flower_type = entry.flower_type.clone();
        let note = entry.note.clone();
        let created_at = format_datetime(&entry.created_at);
        let entry_id = entry.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_GARDEN_ENTRY,
                    rusqlite::params![id, user_id, mood, flower_type, note, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GardenEntry", entry_id))
    }

    async fn delete_garden_entry(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_GARDEN_ENTRY, [&id_str, &user_id_str])
                    .map_err(wrap_err)?;
                require_affected(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GardenEntry", id.to_string()))
    }
}

// ============================================================================
// CountSource implementation
// ============================================================================

#[async_trait]
impl CountSource for SqliteRepository {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn count(&self, user_id: Uuid, kind: ResourceKind) -> SourceResult<u64> {
        match kind {
            ResourceKind::FreeJournal => self.count_query(schema::COUNT_FREE_JOURNALS, user_id).await,
            ResourceKind::GardenEntry => {
                self.count_query(schema::COUNT_GARDEN_ENTRIES, user_id).await
            }
            ResourceKind::GuidedJournal => Err(SourceError::UnsupportedKind {
                source_name: SOURCE_NAME,
                kind,
            }),
        }
    }

    async fn counts(
        &self,
        user_id: Uuid,
        kinds: &[ResourceKind],
    ) -> SourceResult<BTreeMap<ResourceKind, u64>> {
        if let Some(kind) = kinds
            .iter()
            .find(|kind| **kind == ResourceKind::GuidedJournal)
        {
            return Err(SourceError::UnsupportedKind {
                source_name: SOURCE_NAME,
                kind: *kind,
            });
        }

        let user_id_str = user_id.to_string();
        let (free, garden) = self
            .conn
            .call(move |conn| {
                let counts: (i64, i64) = conn
                    .query_row(schema::COUNT_ALL_FOR_USER, [&user_id_str], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })
                    .map_err(wrap_err)?;
                Ok(counts)
            })
            .await
            .map_err(map_source_error)?;

        Ok(kinds
            .iter()
            .map(|kind| {
                let count = match kind {
                    ResourceKind::GardenEntry => garden,
                    _ => free,
                };
                (*kind, count as u64)
            })
            .collect())
    }

    async fn list_previews(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        filters: &PreviewFilters,
    ) -> SourceResult<Vec<PreviewRow>> {
        match kind {
            ResourceKind::FreeJournal => {
                self.preview_query(schema::SELECT_FREE_JOURNAL_PREVIEWS, user_id, filters)
                    .await
            }
            ResourceKind::GardenEntry => {
                self.preview_query(schema::SELECT_GARDEN_PREVIEWS, user_id, filters)
                    .await
            }
            ResourceKind::GuidedJournal => Err(SourceError::UnsupportedKind {
                source_name: SOURCE_NAME,
                kind,
            }),
        }
    }
}
