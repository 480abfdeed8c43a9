use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub training_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub designation: Option<String>,
    pub attendance_status: bool,
    pub feedback_rating: Option<i16>,
    pub feedback_comments: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewParticipant {
    #[validate(length(min = 1, message = "Participant name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub designation: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Feedback rating must be between 1 and 5"))]
    pub feedback_rating: Option<i16>,
    pub feedback_comments: Option<String>,
}

/// Present/total counts for one program's participant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub total: usize,
    /// Whole-number percentage, 0 for an empty list.
    pub rate: u32,
}

impl AttendanceSummary {
    pub fn from_participants(participants: &[Participant]) -> Self {
        let present = participants.iter().filter(|p| p.attendance_status).count();
        let total = participants.len();
        let rate = if total == 0 {
            0
        } else {
            (present as f64 / total as f64 * 100.0).round() as u32
        };
        Self { present, total, rate }
    }
}
