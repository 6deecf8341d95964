//! Preview list handler.
//!
//! The aggregator caches the whole `limit` window; paging walks that window
//! with a keyset cursor, so later pages are served from the same entry.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pauz_core::cache::CacheKeyError;
use pauz_core::journal::ResourceKind;
use pauz_core::preview::{
    validate_page_size, PreviewCursor, PreviewFilters, PreviewRecord, SortOrder,
    DEFAULT_PAGE_SIZE, DEFAULT_PREVIEW_LIMIT,
};

use crate::{handlers::AppError, state::AppState};

/// Query parameters for listing previews.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Size of the cached window (default: 50, max: 200)
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Records per page (default: 20, max: 200)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Opaque token from a previous page's `next_cursor`
    pub cursor: Option<String>,
    /// Earliest creation time, inclusive (RFC 3339 or `YYYY-MM-DD`)
    pub start_date: Option<String>,
    /// Latest creation time, inclusive (RFC 3339 or `YYYY-MM-DD`)
    pub end_date: Option<String>,
    /// Case-insensitive substring of the content
    pub search: Option<String>,
    /// `desc` (default) or `asc`
    pub order: Option<String>,
}

fn default_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl PreviewQuery {
    fn filters(&self) -> Result<PreviewFilters, CacheKeyError> {
        let start = self
            .start_date
            .as_deref()
            .map(|value| parse_date_bound("start_date", value, NaiveTime::MIN))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|value| parse_date_bound("end_date", value, end_of_day()))
            .transpose()?;
        let order = match self.order.as_deref() {
            Some(order) => order.parse()?,
            None => SortOrder::default(),
        };

        Ok(PreviewFilters::new(self.limit)?
            .with_date_range(start, end)?
            .with_search(self.search.as_deref())
            .with_order(order))
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}

/// Parses an ISO 8601 bound. Offsetless values are taken as UTC; a bare date
/// expands to `time_of_day` on that date.
fn parse_date_bound(
    name: &'static str,
    value: &str,
    time_of_day: NaiveTime,
) -> Result<DateTime<Utc>, CacheKeyError> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(at.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(time_of_day).and_utc());
    }
    Err(CacheKeyError::InvalidFilterValue {
        name,
        value: value.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct PreviewPageResponse {
    pub kind: ResourceKind,
    pub items: Vec<PreviewRecord>,
    pub next_cursor: Option<String>,
    pub partial: bool,
}

/// List previews of one kind (GET /api/users/{user_id}/previews/{kind}).
pub async fn list_previews(
    State(state): State<AppState>,
    Path((user_id, kind)): Path<(Uuid, String)>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewPageResponse>, AppError> {
    let kind: ResourceKind = kind.parse()?;
    let filters = query.filters()?;
    let page_size = validate_page_size(query.page_size)?;
    let cursor = query
        .cursor
        .as_deref()
        .map(PreviewCursor::decode)
        .transpose()?;

    let set = state.previews.get_previews(user_id, kind, &filters).await?;
    let page = set.page(cursor.as_ref(), page_size);

    Ok(Json(PreviewPageResponse {
        kind,
        items: page.items,
        next_cursor: page.next_cursor.map(|cursor| cursor.encode()),
        partial: set.is_partial(),
    }))
}
