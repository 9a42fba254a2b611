//! Service catalog implementation.

use crate::dto::{CreateServiceRequest, ServiceResponse, UpdateServiceRequest};
use crate::service_catalog::ServiceCatalog;
use async_trait::async_trait;
use finmark_core::{FinmarkError, FinmarkResult, Page, PageRequest, ServiceId, ServicePatch, ServiceRecord};
use finmark_repository::{ServiceQuery, ServiceRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Catalog backed by a [`ServiceRepository`]. Knows nothing about caching.
#[derive(Component)]
#[shaku(interface = ServiceCatalog)]
pub struct ServiceCatalogImpl {
    #[shaku(inject)]
    repository: Arc<dyn ServiceRepository>,
}

impl ServiceCatalogImpl {
    /// Creates a catalog over the given repository.
    #[must_use]
    pub fn new(repository: Arc<dyn ServiceRepository>) -> Self {
        Self { repository }
    }

    async fn ensure_name_available(&self, name: &str) -> FinmarkResult<()> {
        if self.repository.exists_by_name(name).await? {
            return Err(FinmarkError::conflict(format!(
                "Service with name '{}' already exists",
                name.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceCatalog for ServiceCatalogImpl {
    async fn find_services(&self, query: ServiceQuery, page: PageRequest) -> FinmarkResult<Page<ServiceResponse>> {
        debug!(?query, "Listing services, page: {}, limit: {}", page.page, page.limit);

        let records = self.repository.find(query, page).await?;
        Ok(records.map(ServiceResponse::from))
    }

    async fn find_service_by_id(&self, id: ServiceId) -> FinmarkResult<Option<ServiceResponse>> {
        debug!("Getting service: {}", id);

        Ok(self.repository.find_by_id(id).await?.map(ServiceResponse::from))
    }

    async fn create_service(&self, request: CreateServiceRequest) -> FinmarkResult<ServiceResponse> {
        debug!("Creating service: {}", request.name);

        request.validate_all()?;
        self.ensure_name_available(&request.name).await?;

        let record = ServiceRecord::from(request);
        let saved = self.repository.save(&record).await?;

        info!("Service created: {}", saved.id);
        Ok(ServiceResponse::from(saved))
    }

    async fn update_service(&self, id: ServiceId, request: UpdateServiceRequest) -> FinmarkResult<Option<ServiceResponse>> {
        debug!("Updating service: {}", id);

        request.validate_all()?;

        let Some(mut record) = self.repository.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = request.name.as_deref() {
            if name.trim() != record.name {
                self.ensure_name_available(name).await?;
            }
        }

        record.apply(ServicePatch::from(request));
        let updated = self.repository.update(&record).await?;

        if updated.is_some() {
            info!("Service updated: {}", id);
        }
        Ok(updated.map(ServiceResponse::from))
    }

    async fn delete_service(&self, id: ServiceId) -> FinmarkResult<Option<ServiceResponse>> {
        debug!("Deleting service: {}", id);

        let deleted = self.repository.delete(id).await?;
        if deleted.is_some() {
            info!("Service deleted: {}", id);
        }
        Ok(deleted.map(ServiceResponse::from))
    }
}

impl std::fmt::Debug for ServiceCatalogImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCatalogImpl").finish_non_exhaustive()
    }
}
