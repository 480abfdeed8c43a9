use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    NdmaOfficial,
    SdmaOfficial,
    AtiCoordinator,
    NgoCoordinator,
    FieldOfficer,
}

impl UserRole {
    /// Roles allowed to register new training programs.
    pub fn can_create_training(&self) -> bool {
        matches!(
            self,
            UserRole::Admin
                | UserRole::NdmaOfficial
                | UserRole::SdmaOfficial
                | UserRole::AtiCoordinator
                | UserRole::NgoCoordinator
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::NdmaOfficial => "ndma_official",
            UserRole::SdmaOfficial => "sdma_official",
            UserRole::AtiCoordinator => "ati_coordinator",
            UserRole::NgoCoordinator => "ngo_coordinator",
            UserRole::FieldOfficer => "field_officer",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub organization: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub phone: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
