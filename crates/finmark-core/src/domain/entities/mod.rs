//! Domain entities.

mod service_record;

pub use service_record::*;
