//! # Finmark Core
//!
//! Core types, traits, and error definitions for the Finmark service catalog.
//! This crate provides the foundational abstractions used by the repository,
//! service and server layers, together with the service record domain model.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod timeout;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use timeout::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
