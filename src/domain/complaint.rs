//! Complaint domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Complaint lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in-progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint entity.
///
/// `citizen_id` is the owner; `assigned_to` references the agency handling
/// the complaint. Both drive the ownership/scope checks in `policy`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Complaint {
    pub id: StringUuid,
    pub title: String,
    pub description: String,
    /// Category name as submitted (categories are looked up by name)
    pub category: String,
    pub location: String,
    /// Image URLs, stored as a JSON array
    pub images: Json<Vec<String>>,
    pub status: ComplaintStatus,
    pub citizen_id: StringUuid,
    pub assigned_to: Option<StringUuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting a complaint. The owner and the initial status are
/// never client-supplied; the service derives them from the principal.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComplaintInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 255))]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Input for a status update by an agency or admin
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComplaintStatusInput {
    pub status: ComplaintStatus,
    pub assigned_to: Option<Uuid>,
}

/// Caller-supplied list filters. These are intersected with the mandatory
/// ownership scope; they can narrow the visible set, never widen it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ComplaintStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: ComplaintStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, ComplaintStatus::Resolved);
    }

    #[test]
    fn test_create_complaint_input_validation() {
        let input = CreateComplaintInput {
            title: String::new(),
            description: "The street light is broken".to_string(),
            category: "Infrastructure".to_string(),
            location: "Main St / 4th Ave".to_string(),
            images: vec![],
        };
        assert!(input.validate().is_err());

        let valid = CreateComplaintInput {
            title: "Broken street light".to_string(),
            ..input
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_filter_defaults_empty() {
        let filter: ComplaintFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.status.is_none());
        assert!(filter.category.is_none());
    }
}
