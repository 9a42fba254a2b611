//! Data Transfer Objects (DTOs).

mod service_dto;

pub use service_dto::*;
