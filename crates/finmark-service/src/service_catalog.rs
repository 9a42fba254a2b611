//! Service catalog trait definition.

use crate::dto::{CreateServiceRequest, ServiceResponse, UpdateServiceRequest};
use async_trait::async_trait;
use finmark_core::{FinmarkResult, Interface, Page, PageRequest, ServiceId};
use finmark_repository::ServiceQuery;

/// Catalog of business services.
#[async_trait]
pub trait ServiceCatalog: Interface + Send + Sync {
    /// Lists services matching the filters, one page at a time.
    async fn find_services(&self, query: ServiceQuery, page: PageRequest) -> FinmarkResult<Page<ServiceResponse>>;

    /// Gets a service by ID, or `None` if it does not exist.
    async fn find_service_by_id(&self, id: ServiceId) -> FinmarkResult<Option<ServiceResponse>>;

    /// Creates a new service. Names must be unique.
    async fn create_service(&self, request: CreateServiceRequest) -> FinmarkResult<ServiceResponse>;

    /// Applies a partial update. Returns `None` if the service does not exist.
    async fn update_service(&self, id: ServiceId, request: UpdateServiceRequest) -> FinmarkResult<Option<ServiceResponse>>;

    /// Deletes a service, returning it if it existed.
    async fn delete_service(&self, id: ServiceId) -> FinmarkResult<Option<ServiceResponse>>;
}
