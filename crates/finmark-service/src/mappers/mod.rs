//! Entity-DTO mappers.

use crate::dto::{CreateServiceRequest, UpdateServiceRequest};
use finmark_core::{ServicePatch, ServiceRecord};

impl From<CreateServiceRequest> for ServiceRecord {
    fn from(request: CreateServiceRequest) -> Self {
        ServiceRecord::new(
            request.name,
            request.description,
            request.category,
            request.industry,
            request.price,
            request.duration_hours,
            request.tags,
        )
    }
}

impl From<UpdateServiceRequest> for ServicePatch {
    fn from(request: UpdateServiceRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            category: request.category,
            industry: request.industry,
            price: request.price,
            duration_hours: request.duration_hours,
            tags: request.tags,
        }
    }
}
