//! Service category value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// High-level classification of a catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceCategory {
    #[serde(rename = "Financial Analysis")]
    FinancialAnalysis,
    #[serde(rename = "Marketing Analytics")]
    MarketingAnalytics,
    #[serde(rename = "Business Intelligence")]
    BusinessIntelligence,
    #[serde(rename = "Consulting Services")]
    ConsultingServices,
}

impl ServiceCategory {
    /// All categories, in display order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::FinancialAnalysis,
            Self::MarketingAnalytics,
            Self::BusinessIntelligence,
            Self::ConsultingServices,
        ]
    }

    /// Returns the display label used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialAnalysis => "Financial Analysis",
            Self::MarketingAnalytics => "Marketing Analytics",
            Self::BusinessIntelligence => "Business Intelligence",
            Self::ConsultingServices => "Consulting Services",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown service category: {}", s))
    }
}
