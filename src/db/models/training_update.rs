use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// Update types offered by the field-report form. The column itself is free
/// text, so anything else is accepted as well.
pub const SUGGESTED_UPDATE_TYPES: &[&str] = &[
    "Progress Update",
    "Attendance Report",
    "Activity Completion",
    "Issue/Challenge",
    "Resource Request",
    "Safety Alert",
    "General Information",
];

pub const DEFAULT_UPDATE_TYPE: &str = "Progress Update";

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct TrainingUpdate {
    pub id: Uuid,
    pub training_id: Uuid,
    pub update_type: String,
    pub message: String,
    pub images: Option<Vec<String>>,
    pub posted_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// An update joined with the display fields of its program and poster.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct TrainingUpdateDetail {
    pub id: Uuid,
    pub training_id: Uuid,
    pub update_type: String,
    pub message: String,
    pub images: Option<Vec<String>>,
    pub posted_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub training_title: Option<String>,
    pub location_name: Option<String>,
    pub state: Option<String>,
    pub poster_name: Option<String>,
}

fn default_update_type() -> String {
    DEFAULT_UPDATE_TYPE.to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTrainingUpdate {
    #[serde(default = "default_update_type")]
    #[validate(length(min = 1, message = "Update type is required"))]
    pub update_type: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    pub images: Option<Vec<String>>,
}
