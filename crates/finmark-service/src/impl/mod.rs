//! Service catalog implementations.
//!
//! Trait definitions live in the parent module (`service_catalog.rs`).

pub mod service_catalog_impl;

pub use service_catalog_impl::ServiceCatalogImpl;
