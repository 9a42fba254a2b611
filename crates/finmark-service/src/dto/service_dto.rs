//! Service catalog DTOs.

use finmark_core::validation::rules::not_blank;
use finmark_core::{
    DurationHours, FinmarkResult, Industry, ServiceCategory, ServiceId, ServiceRecord,
    ValidateExt,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Request to create a new catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub category: ServiceCategory,

    pub industry: Industry,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    pub duration_hours: DurationHours,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateServiceRequest {
    /// Runs derived rules, then rejects whitespace-only text fields.
    pub fn validate_all(&self) -> FinmarkResult<()> {
        self.validate_request()?;
        check_not_blank([("name", Some(&self.name)), ("description", Some(&self.description))])
    }
}

/// Request to partially update a catalog service. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    pub category: Option<ServiceCategory>,

    pub industry: Option<Industry>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub duration_hours: Option<DurationHours>,

    pub tags: Option<Vec<String>>,
}

impl UpdateServiceRequest {
    /// Runs derived rules, then rejects whitespace-only text fields.
    pub fn validate_all(&self) -> FinmarkResult<()> {
        self.validate_request()?;
        check_not_blank([
            ("name", self.name.as_ref()),
            ("description", self.description.as_ref()),
        ])
    }
}

fn check_not_blank<'a>(fields: [(&'static str, Option<&'a String>); 2]) -> FinmarkResult<()> {
    let mut errors = ValidationErrors::new();
    for (field, value) in fields {
        if let Some(value) = value {
            if let Err(mut error) = not_blank(value) {
                error.message = Some(format!("{} cannot be blank", field).into());
                errors.add(field, error);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(finmark_core::validation_errors_to_finmark_error(errors))
    }
}

/// Catalog service response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub category: ServiceCategory,
    pub industry: Industry,
    pub price: f64,
    #[serde(rename = "duration_hours")]
    pub duration_hours: DurationHours,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRecord> for ServiceResponse {
    fn from(record: ServiceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            category: record.category,
            industry: record.industry,
            price: record.price,
            duration_hours: record.duration_hours,
            tags: record.tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
