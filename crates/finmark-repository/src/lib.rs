//! # Finmark Repository
//!
//! Data access for service records:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ServiceRepository>  (domain interface)
//! InMemoryServiceRepository        (process-local store)
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   traits.rs                             ← ServiceRepository trait, ServiceQuery
//!   impl/
//!     mod.rs
//!     in_memory_service_repository.rs     ← InMemoryServiceRepository
//! ```

pub mod r#impl;
pub mod traits;

pub use r#impl::InMemoryServiceRepository;
pub use traits::*;
