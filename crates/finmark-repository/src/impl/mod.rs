//! Repository implementations.

mod in_memory_service_repository;

pub use in_memory_service_repository::InMemoryServiceRepository;
