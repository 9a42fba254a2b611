//! # Finmark Service
//!
//! Business logic for the service catalog, plus the read-through caching
//! layer that fronts it.
//!
//! ```text
//! caller
//!   ↓  Arc<dyn ServiceCatalog>
//! CachedServiceCatalog      (MethodCache: read-through, flush on write)
//!   ↓  Arc<dyn ServiceCatalog>
//! ServiceCatalogImpl        (validation, conflicts)
//!   ↓  Arc<dyn ServiceRepository>
//! ```

pub mod cache;
pub mod cached_service_catalog;
pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod service_catalog;

pub use cache::*;
pub use cached_service_catalog::CachedServiceCatalog;
pub use dto::*;
pub use r#impl::ServiceCatalogImpl;
pub use service_catalog::*;
