//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are stored as fixed-width RFC 3339 strings
//! (microsecond precision, `Z` suffix) so text ordering is time ordering.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS free_journals (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    session_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS garden_entries (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    mood TEXT NOT NULL,
    flower_type TEXT NOT NULL,
    note TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_free_journals_user_created ON free_journals(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_garden_entries_user_created ON garden_entries(user_id, created_at);
"#;

// Free journal queries
pub const INSERT_FREE_JOURNAL: &str = r#"
INSERT INTO free_journals (id, user_id, session_id, content, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_FREE_JOURNAL: &str = r#"
SELECT id, user_id, session_id, content, created_at, updated_at
FROM free_journals
WHERE id = ?1 AND user_id = ?2
"#;

pub const UPDATE_FREE_JOURNAL: &str = r#"
UPDATE free_journals
SET session_id = ?3, content = ?4, updated_at = ?5
WHERE id = ?1 AND user_id = ?2
"#;

pub const DELETE_FREE_JOURNAL: &str = r#"
DELETE FROM free_journals
WHERE id = ?1 AND user_id = ?2
"#;

// Preview params: ?1 user, ?2 fetch chars, ?3 limit, ?4 start, ?5 end,
// ?6 escaped search term, ?7 'asc' | 'desc'. NULL bounds are open.
pub const SELECT_FREE_JOURNAL_PREVIEWS: &str = r#"
SELECT id, substr(content, 1, ?2), created_at
FROM free_journals
WHERE user_id = ?1
  AND (?4 IS NULL OR created_at >= ?4)
  AND (?5 IS NULL OR created_at <= ?5)
  AND (?6 IS NULL OR content LIKE '%' || ?6 || '%' ESCAPE '\')
ORDER BY
  CASE WHEN ?7 = 'asc' THEN created_at END ASC,
  CASE WHEN ?7 = 'desc' THEN created_at END DESC,
  id ASC
LIMIT ?3
"#;

// Garden queries
pub const INSERT_GARDEN_ENTRY: &str = r#"
INSERT INTO garden_entries (id, user_id, mood, flower_type, note, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_GARDEN_ENTRY: &str = r#"
SELECT id, user_id, mood, flower_type, note, created_at
FROM garden_entries
WHERE id = ?1 AND user_id = ?2
"#;

pub const DELETE_GARDEN_ENTRY: &str = r#"
DELETE FROM garden_entries
WHERE id = ?1 AND user_id = ?2
"#;

pub const SELECT_GARDEN_PREVIEWS: &str = r#"
SELECT id, substr(COALESCE(note, ''), 1, ?2), created_at
FROM garden_entries
WHERE user_id = ?1
  AND (?4 IS NULL OR created_at >= ?4)
  AND (?5 IS NULL OR created_at <= ?5)
  AND (?6 IS NULL OR COALESCE(note, '') LIKE '%' || ?6 || '%' ESCAPE '\')
ORDER BY
  CASE WHEN ?7 = 'asc' THEN created_at END ASC,
  CASE WHEN ?7 = 'desc' THEN created_at END DESC,
  id ASC
LIMIT ?3
"#;

// Aggregates
pub const COUNT_FREE_JOURNALS: &str = r#"
SELECT COUNT(*) FROM free_journals WHERE user_id = ?1
"#;

pub const COUNT_GARDEN_ENTRIES: &str = r#"
SELECT COUNT(*) FROM garden_entries WHERE user_id = ?1
"#;

/// Both relational counts in one round trip.
pub const COUNT_ALL_FOR_USER: &str = r#"
SELECT
    (SELECT COUNT(*) FROM free_journals WHERE user_id = ?1),
    (SELECT COUNT(*) FROM garden_entries WHERE user_id = ?1)
"#;
