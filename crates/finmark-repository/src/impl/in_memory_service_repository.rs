//! `InMemoryServiceRepository`: process-local service record store.
//!
//! Records live in a `HashMap` behind a `parking_lot::RwLock`. Listings are
//! ordered by ID, which for time-ordered UUIDs is creation order, so paging is
//! stable between calls.

use crate::traits::{ServiceQuery, ServiceRepository};
use async_trait::async_trait;
use finmark_core::{FinmarkError, FinmarkResult, Page, PageRequest, ServiceId, ServiceRecord};
use parking_lot::RwLock;
use shaku::Component;
use std::collections::HashMap;
use tracing::debug;

/// In-memory repository implementation.
#[derive(Component, Default)]
#[shaku(interface = ServiceRepository)]
pub struct InMemoryServiceRepository {
    #[shaku(default)]
    records: RwLock<HashMap<ServiceId, ServiceRecord>>,
}

impl InMemoryServiceRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with records.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = ServiceRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    fn name_taken_by_other(records: &HashMap<ServiceId, ServiceRecord>, record: &ServiceRecord) -> bool {
        records
            .values()
            .any(|existing| existing.id != record.id && existing.name == record.name)
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn find(&self, query: ServiceQuery, page: PageRequest) -> FinmarkResult<Page<ServiceRecord>> {
        debug!(?query, page = page.page, limit = page.limit, "Repository: find");
        let records = self.records.read();

        let mut matching: Vec<&ServiceRecord> = records.values().filter(|r| query.matches(r)).collect();
        matching.sort_by_key(|r| r.id);

        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(page.skip())
            .take(page.limit())
            .cloned()
            .collect();

        Ok(Page::new(data, page, total))
    }

    async fn find_by_id(&self, id: ServiceId) -> FinmarkResult<Option<ServiceRecord>> {
        debug!("Repository: find_by_id {}", id);
        Ok(self.records.read().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> FinmarkResult<Option<ServiceRecord>> {
        let name = name.trim();
        Ok(self.records.read().values().find(|r| r.name == name).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> FinmarkResult<bool> {
        let name = name.trim();
        Ok(self.records.read().values().any(|r| r.name == name))
    }

    async fn save(&self, record: &ServiceRecord) -> FinmarkResult<ServiceRecord> {
        debug!("Repository: save {}", record.id);
        let mut records = self.records.write();
        if Self::name_taken_by_other(&records, record) {
            return Err(FinmarkError::conflict(format!(
                "Service with name '{}' already exists",
                record.name
            )));
        }
        records.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn update(&self, record: &ServiceRecord) -> FinmarkResult<Option<ServiceRecord>> {
        debug!("Repository: update {}", record.id);
        let mut records = self.records.write();
        if !records.contains_key(&record.id) {
            return Ok(None);
        }
        if Self::name_taken_by_other(&records, record) {
            return Err(FinmarkError::conflict(format!(
                "Service with name '{}' already exists",
                record.name
            )));
        }
        records.insert(record.id, record.clone());
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: ServiceId) -> FinmarkResult<Option<ServiceRecord>> {
        debug!("Repository: delete {}", id);
        Ok(self.records.write().remove(&id))
    }

    async fn count(&self, query: ServiceQuery) -> FinmarkResult<u64> {
        Ok(self.records.read().values().filter(|r| query.matches(r)).count() as u64)
    }
}
