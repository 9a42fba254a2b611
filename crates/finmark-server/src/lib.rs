//! # Finmark Server Library
//!
//! Dependency injection wiring and application assembly for the Finmark
//! service catalog.

pub mod app;
pub mod di;
pub mod startup;

pub use app::Application;
