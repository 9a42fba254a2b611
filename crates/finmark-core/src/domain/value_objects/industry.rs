//! Target industry value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Industry vertical a catalog service targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    Retail,
    #[serde(rename = "E-commerce")]
    ECommerce,
    Healthcare,
    Manufacturing,
}

impl Industry {
    /// All industries, in display order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Retail, Self::ECommerce, Self::Healthcare, Self::Manufacturing]
    }

    /// Returns the display label used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "Retail",
            Self::ECommerce => "E-commerce",
            Self::Healthcare => "Healthcare",
            Self::Manufacturing => "Manufacturing",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("Unknown industry: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_wire_format() {
        assert_eq!(serde_json::to_string(&Industry::ECommerce).unwrap(), "\"E-commerce\"");
        assert_eq!(serde_json::to_string(&Industry::Retail).unwrap(), "\"Retail\"");
        let parsed: Industry = serde_json::from_str("\"Healthcare\"").unwrap();
        assert_eq!(parsed, Industry::Healthcare);
    }

    #[test]
    fn test_industry_from_str() {
        assert_eq!("E-commerce".parse::<Industry>().unwrap(), Industry::ECommerce);
        assert!("Mining".parse::<Industry>().is_err());
    }
}
