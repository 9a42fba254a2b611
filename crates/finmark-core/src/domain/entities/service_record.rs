//! Service record entity.

use super::super::value_objects::{DurationHours, Industry, ServiceCategory};
use crate::{Entity, ServiceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A business offering listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Unique identifier for the service.
    pub id: ServiceId,

    /// Unique, trimmed display name, e.g. "Financial Analysis for Retail - Profitability Optimization".
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// High-level classification.
    pub category: ServiceCategory,

    /// Target industry vertical.
    pub industry: Industry,

    /// Price, never negative.
    pub price: f64,

    /// Time required to deliver the service.
    #[serde(rename = "duration_hours")]
    pub duration_hours: DurationHours,

    /// Search keywords.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial changes to a service record. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ServiceCategory>,
    pub industry: Option<Industry>,
    pub price: Option<f64>,
    pub duration_hours: Option<DurationHours>,
    pub tags: Option<Vec<String>>,
}

impl ServicePatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ServiceRecord {
    /// Creates a new service record. The name is trimmed.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: ServiceCategory,
        industry: Industry,
        price: f64,
        duration_hours: DurationHours,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ServiceId::new(),
            name: name.into().trim().to_string(),
            description: description.into(),
            category,
            industry,
            price,
            duration_hours,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update and bumps `updated_at` if anything was supplied.
    pub fn apply(&mut self, patch: ServicePatch) {
        if patch.is_empty() {
            return;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(industry) = patch.industry {
            self.industry = industry;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(duration_hours) = patch.duration_hours {
            self.duration_hours = duration_hours;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Checks whether the record matches an optional category and industry filter.
    #[must_use]
    pub fn matches(&self, category: Option<ServiceCategory>, industry: Option<Industry>) -> bool {
        category.map_or(true, |c| c == self.category) && industry.map_or(true, |i| i == self.industry)
    }
}

impl Entity<ServiceId> for ServiceRecord {
    fn id(&self) -> &ServiceId {
        &self.id
    }
}
