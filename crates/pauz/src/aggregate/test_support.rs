//! Hand-written `CountSource` mock with call counters.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use pauz_core::journal::ResourceKind;
use pauz_core::preview::{sort_by_order, PreviewFilters, PreviewRow};
use pauz_core::sources::{CountSource, SourceError, SourceResult};

#[derive(Debug, Default)]
pub struct MockCountSource {
    pub counts: Mutex<HashMap<(Uuid, ResourceKind), u64>>,
    pub rows: Mutex<HashMap<(Uuid, ResourceKind), Vec<PreviewRow>>>,
    pub failing: AtomicBool,
    pub count_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl MockCountSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&self, user_id: Uuid, kind: ResourceKind, count: u64) {
        self.counts
            .lock()
            .unwrap()
            .insert((user_id, kind), count);
    }

    pub fn push_row(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        id: Uuid,
        content: &str,
        created_at: DateTime<Utc>,
    ) {
        self.rows
            .lock()
            .unwrap()
            .entry((user_id, kind))
            .or_default()
            .push(PreviewRow {
                id,
                content_prefix: content.to_string(),
                created_at,
                source_truncated: false,
            });
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> SourceResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SourceError::unavailable("mock", "connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CountSource for MockCountSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn count(&self, user_id: Uuid, kind: ResourceKind) -> SourceResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(&(user_id, kind))
            .copied()
            .unwrap_or(0))
    }

    async fn counts(
        &self,
        user_id: Uuid,
        kinds: &[ResourceKind],
    ) -> SourceResult<BTreeMap<ResourceKind, u64>> {
        // One combined query
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let counts = self.counts.lock().unwrap();
        Ok(kinds
            .iter()
            .map(|kind| (*kind, counts.get(&(user_id, *kind)).copied().unwrap_or(0)))
            .collect())
    }

    async fn list_previews(
        &self,
        user_id: Uuid,
        kind: ResourceKind,
        filters: &PreviewFilters,
    ) -> SourceResult<Vec<PreviewRow>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<PreviewRow> = rows
            .get(&(user_id, kind))
            .map(|rows| {
                rows.iter()
                    .filter(|row| filters.matches(row.created_at, &row.content_prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sort_by_order(&mut matching, filters.order(), |row| (row.created_at, row.id));
        matching.truncate(filters.limit());
        Ok(matching)
    }
}
