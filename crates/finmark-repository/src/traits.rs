//! Repository trait definitions.

use finmark_core::{
    FinmarkResult, Industry, Interface, Page, PageRequest, ServiceCategory, ServiceId,
    ServiceRecord,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Listing filters. An absent filter matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceQuery {
    pub category: Option<ServiceCategory>,
    pub industry: Option<Industry>,
}

impl ServiceQuery {
    /// A query with no filters.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to one category.
    #[must_use]
    pub fn with_category(mut self, category: ServiceCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts the query to one industry.
    #[must_use]
    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    /// Checks whether a record passes the filters.
    #[must_use]
    pub fn matches(&self, record: &ServiceRecord) -> bool {
        record.matches(self.category, self.industry)
    }
}

/// Service record repository trait.
#[async_trait]
pub trait ServiceRepository: Interface + Send + Sync {
    /// Finds records matching the query, one page at a time.
    async fn find(&self, query: ServiceQuery, page: PageRequest) -> FinmarkResult<Page<ServiceRecord>>;

    /// Finds a record by ID.
    async fn find_by_id(&self, id: ServiceId) -> FinmarkResult<Option<ServiceRecord>>;

    /// Finds a record by its exact (trimmed) name.
    async fn find_by_name(&self, name: &str) -> FinmarkResult<Option<ServiceRecord>>;

    /// Checks if a name is taken.
    async fn exists_by_name(&self, name: &str) -> FinmarkResult<bool>;

    /// Saves a new record.
    async fn save(&self, record: &ServiceRecord) -> FinmarkResult<ServiceRecord>;

    /// Replaces an existing record. Returns `None` if the record is absent.
    async fn update(&self, record: &ServiceRecord) -> FinmarkResult<Option<ServiceRecord>>;

    /// Removes a record, returning it if it existed.
    async fn delete(&self, id: ServiceId) -> FinmarkResult<Option<ServiceRecord>>;

    /// Counts records matching the query.
    async fn count(&self, query: ServiceQuery) -> FinmarkResult<u64>;
}
