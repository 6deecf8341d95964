use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::{CacheKeyError, FilterSignature};
use crate::journal::ResourceKind;

use super::{sort_by_order, truncate_chars, CursorError, PageSizeError, SortOrder};

/// Maximum characters of content kept in a preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Characters sources return per row: one past the bound, so truncation is detectable.
pub const PREVIEW_FETCH_CHARS: usize = PREVIEW_MAX_CHARS + 1;

/// Bytes read from an object body to cover [`PREVIEW_FETCH_CHARS`] characters.
pub const PREVIEW_FETCH_BYTES: usize = PREVIEW_FETCH_CHARS * 4;

pub const DEFAULT_PREVIEW_LIMIT: usize = 50;
pub const MAX_PREVIEW_LIMIT: usize = 200;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Accepts page sizes in `1..=MAX_PREVIEW_LIMIT`.
pub fn validate_page_size(size: usize) -> Result<usize, PageSizeError> {
    if size == 0 || size > MAX_PREVIEW_LIMIT {
        return Err(PageSizeError {
            size,
            max: MAX_PREVIEW_LIMIT,
        });
    }
    Ok(size)
}

/// A lightweight row as returned by a source: no full content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub id: Uuid,
    /// At most [`PREVIEW_FETCH_CHARS`] leading characters of the record's content.
    pub content_prefix: String,
    pub created_at: DateTime<Utc>,
    /// True when the source already knows content follows `content_prefix`,
    /// e.g. an object body whose read stopped at an undecodable byte.
    pub source_truncated: bool,
}

/// A list-view projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRecord {
    pub id: Uuid,
    pub kind: ResourceKind,
    /// Literal prefix of the record's content, at most [`PREVIEW_MAX_CHARS`] characters.
    pub content: String,
    /// True when the record's content is longer than `content`.
    pub truncated: bool,
    pub created_at: DateTime<Utc>,
}

impl PreviewRecord {
    /// Builds a record from a source row, enforcing the preview bound.
    pub fn from_row(kind: ResourceKind, row: PreviewRow) -> Self {
        let (content, truncated) = truncate_chars(&row.content_prefix, PREVIEW_MAX_CHARS);
        Self {
            id: row.id,
            kind,
            content: content.to_string(),
            truncated: truncated || row.source_truncated,
            created_at: row.created_at,
        }
    }

    fn sort_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }

    /// Returns the cursor pointing just past this record.
    pub fn cursor(&self) -> PreviewCursor {
        PreviewCursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Filters that select a preview window. Every field is part of the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFilters {
    limit: usize,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    search: Option<String>,
    order: SortOrder,
}

impl PreviewFilters {
    /// Creates unfiltered filters fetching the `limit` newest records.
    pub fn new(limit: usize) -> Result<Self, CacheKeyError> {
        if limit == 0 || limit > MAX_PREVIEW_LIMIT {
            return Err(CacheKeyError::LimitOutOfRange {
                limit,
                max: MAX_PREVIEW_LIMIT,
            });
        }
        Ok(Self {
            limit,
            ..Self::default()
        })
    }

    /// Restricts the window to records created within `[start, end]`.
    /// Either bound may be open.
    pub fn with_date_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, CacheKeyError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CacheKeyError::InvalidDateRange {
                    start: format_bound(start),
                    end: format_bound(end),
                });
            }
        }
        self.start_date = start;
        self.end_date = end;
        Ok(self)
    }

    /// Keeps only records whose content contains `search`, ignoring ASCII case.
    /// Blank input clears the filter.
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// True when `created_at` falls inside the date range, bounds inclusive.
    pub fn matches_date(&self, created_at: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| created_at >= start)
            && self.end_date.map_or(true, |end| created_at <= end)
    }

    /// True when `content` contains the search term, ignoring ASCII case.
    pub fn matches_search(&self, content: &str) -> bool {
        match &self.search {
            Some(term) => content
                .to_ascii_lowercase()
                .contains(&term.to_ascii_lowercase()),
            None => true,
        }
    }

    pub fn matches(&self, created_at: DateTime<Utc>, content: &str) -> bool {
        self.matches_date(created_at) && self.matches_search(content)
    }

    /// Returns the deterministic signature used in the cache key.
    pub fn signature(&self) -> Result<FilterSignature, CacheKeyError> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("order", self.order.as_str().to_string()),
        ];
        if let Some(start) = self.start_date {
            pairs.push(("start_date", format_bound(start)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", format_bound(end)));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        FilterSignature::from_pairs(pairs)
    }
}

impl Default for PreviewFilters {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PREVIEW_LIMIT,
            start_date: None,
            end_date: None,
            search: None,
            order: SortOrder::default(),
        }
    }
}

fn format_bound(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Keyset position inside a [`PreviewSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl PreviewCursor {
    /// Encodes the cursor as an opaque, URL-safe token.
    pub fn encode(&self) -> String {
        format!(
            "{}.{:09}_{}",
            self.created_at.timestamp(),
            self.created_at.timestamp_subsec_nanos(),
            self.id.simple()
        )
    }

    /// Decodes a token produced by [`PreviewCursor::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let invalid = || CursorError(token.to_string());

        let (timestamp, id) = token.split_once('_').ok_or_else(invalid)?;
        let (secs, nanos) = timestamp.split_once('.').ok_or_else(invalid)?;
        let secs: i64 = secs.parse().map_err(|_| invalid())?;
        let nanos: u32 = nanos.parse().map_err(|_| invalid())?;
        let created_at = DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(invalid)?;
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;

        Ok(Self { created_at, id })
    }

    /// Returns true if `record` sorts strictly after this cursor in `order`.
    fn precedes(&self, record: &PreviewRecord, order: SortOrder) -> bool {
        order
            .compare((self.created_at, self.id), record.sort_key())
            .is_lt()
    }
}

/// One bounded page of a [`PreviewSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPage {
    pub items: Vec<PreviewRecord>,
    /// Present when more records follow this page.
    pub next_cursor: Option<PreviewCursor>,
}

/// An ordered, immutable window of previews.
///
/// Cheap to clone. Iteration can be restarted at any time and paging never
/// requires walking the records before the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSet {
    kind: ResourceKind,
    records: Arc<[PreviewRecord]>,
    partial: bool,
    order: SortOrder,
}

impl PreviewSet {
    /// Builds a set, ordering records newest first with an ID tie-break.
    pub fn new(kind: ResourceKind, records: Vec<PreviewRecord>, partial: bool) -> Self {
        Self::ordered(kind, records, partial, SortOrder::NewestFirst)
    }

    /// Builds a set ordered by `order`, with an ascending ID tie-break.
    pub fn ordered(
        kind: ResourceKind,
        mut records: Vec<PreviewRecord>,
        partial: bool,
        order: SortOrder,
    ) -> Self {
        sort_by_order(&mut records, order, PreviewRecord::sort_key);
        Self {
            kind,
            records: records.into(),
            partial,
            order,
        }
    }

    /// An empty set standing in for an unavailable source.
    pub fn degraded(kind: ResourceKind) -> Self {
        Self::new(kind, Vec::new(), true)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// True when the source was unavailable and the set is a stand-in.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PreviewRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PreviewRecord> {
        self.records.iter()
    }

    /// Returns up to `size` records following `after` (or from the start).
    pub fn page(&self, after: Option<&PreviewCursor>, size: usize) -> PreviewPage {
        let size = size.max(1);
        let start = match after {
            Some(cursor) => self
                .records
                .partition_point(|r| !cursor.precedes(r, self.order)),
            None => 0,
        };
        let end = start.saturating_add(size).min(self.records.len());
        let items = self.records[start..end].to_vec();
        let next_cursor = if end < self.records.len() {
            items.last().map(PreviewRecord::cursor)
        } else {
            None
        };

        PreviewPage { items, next_cursor }
    }
}

impl<'a> IntoIterator for &'a PreviewSet {
    type Item = &'a PreviewRecord;
    type IntoIter = std::slice::Iter<'a, PreviewRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
