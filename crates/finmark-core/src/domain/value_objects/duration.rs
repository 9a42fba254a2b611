//! Delivery duration value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time required to deliver a service, restricted to a predefined set of hours.
///
/// Serialized as the bare number of hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DurationHours {
    One,
    Two,
    Four,
    Eight,
    Twelve,
}

impl DurationHours {
    /// All allowed durations, shortest first.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [Self::One, Self::Two, Self::Four, Self::Eight, Self::Twelve]
    }

    /// Returns the number of hours.
    #[must_use]
    pub const fn hours(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Twelve => 12,
        }
    }
}

impl TryFrom<u8> for DurationHours {
    type Error = String;

    fn try_from(hours: u8) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|d| d.hours() == hours)
            .ok_or_else(|| format!("Unsupported duration: {} hours (allowed: 1, 2, 4, 8, 12)", hours))
    }
}

impl From<DurationHours> for u8 {
    fn from(duration: DurationHours) -> Self {
        duration.hours()
    }
}

impl fmt::Display for DurationHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}
