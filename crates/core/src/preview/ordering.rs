use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::CacheKeyError;

/// Newest first; equal timestamps fall back to ascending ID.
fn compare_newest_first(a: (DateTime<Utc>, Uuid), b: (DateTime<Utc>, Uuid)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

/// Oldest first; equal timestamps fall back to ascending ID.
fn compare_oldest_first(a: (DateTime<Utc>, Uuid), b: (DateTime<Utc>, Uuid)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1))
}

/// Direction of a preview window over creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "desc")]
    NewestFirst,
    #[serde(rename = "asc")]
    OldestFirst,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "desc",
            SortOrder::OldestFirst => "asc",
        }
    }

    /// Compares two `(created_at, id)` keys. The ID tie-break is ascending
    /// in both directions.
    pub fn compare(&self, a: (DateTime<Utc>, Uuid), b: (DateTime<Utc>, Uuid)) -> Ordering {
        match self {
            SortOrder::NewestFirst => compare_newest_first(a, b),
            SortOrder::OldestFirst => compare_oldest_first(a, b),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CacheKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desc" => Ok(SortOrder::NewestFirst),
            "asc" => Ok(SortOrder::OldestFirst),
            _ => Err(CacheKeyError::InvalidFilterValue {
                name: "order",
                value: s.to_string(),
            }),
        }
    }
}

/// Sorts items in `order` with a stable ID tie-break.
pub fn sort_by_order<T, F>(items: &mut [T], order: SortOrder, key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, Uuid),
{
    items.sort_by(|a, b| order.compare(key(a), key(b)));
}
