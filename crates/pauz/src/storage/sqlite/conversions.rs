//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use pauz_core::journal::{FreeJournal, GardenEntry};
use pauz_core::preview::PreviewRow;

/// Convert a SQLite row to a FreeJournal.
///
/// Expected columns: id, user_id, session_id, content, created_at, updated_at
pub fn row_to_free_journal(row: &Row) -> rusqlite::Result<FreeJournal> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let session_id: String = row.get(2)?;
    let content: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(FreeJournal {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        session_id,
        content,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to a GardenEntry.
///
/// Expected columns: id, user_id, mood, flower_type, note, created_at
pub fn row_to_garden_entry(row: &Row) -> rusqlite::Result<GardenEntry> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let mood: String = row.get(2)?;
    let flower_type: String = row.get(3)?;
    let note: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(GardenEntry {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        mood,
        flower_type,
        note,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Convert a projected preview row.
///
/// Expected columns: id, content prefix, created_at
pub fn row_to_preview(row: &Row) -> rusqlite::Result<PreviewRow> {
    let id: String = row.get(0)?;
    let content_prefix: String = row.get(1)?;
    let created_at: String = row.get(2)?;

    Ok(PreviewRow {
        id: parse_uuid(&id)?,
        content_prefix,
        created_at: parse_datetime(&created_at)?,
        source_truncated: false,
    })
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage.
///
/// Fixed width, so lexicographic order matches chronological order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let fractional = whole + chrono::Duration::microseconds(1500);

        assert_eq!(format_datetime(&whole), "2024-06-15T10:30:00.000000Z");
        assert_eq!(format_datetime(&fractional), "2024-06-15T10:30:00.001500Z");
        assert!(format_datetime(&whole) < format_datetime(&fractional));
    }

    #[test]
    fn test_parse_datetime_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_datetime(&format_datetime(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-datetime").is_err());
    }

    #[test]
    fn test_parse_uuid_invalid() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }
}
