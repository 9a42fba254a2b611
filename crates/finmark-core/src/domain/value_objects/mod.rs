//! Value objects.

mod category;
mod duration;
mod industry;

pub use category::*;
pub use duration::*;
pub use industry::*;
