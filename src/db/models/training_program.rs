use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use std::fmt::{self, Display};
use std::str::FromStr;
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "training_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl TrainingStatus {
    pub fn all() -> &'static [TrainingStatus] {
        &[
            TrainingStatus::Planned,
            TrainingStatus::Ongoing,
            TrainingStatus::Completed,
            TrainingStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Planned => "planned",
            TrainingStatus::Ongoing => "ongoing",
            TrainingStatus::Completed => "completed",
            TrainingStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for TrainingStatus {
    fn default() -> Self {
        TrainingStatus::Planned
    }
}

impl Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(TrainingStatus::Planned),
            "ongoing" => Ok(TrainingStatus::Ongoing),
            "completed" => Ok(TrainingStatus::Completed),
            "cancelled" => Ok(TrainingStatus::Cancelled),
            _ => Err(format!("Unknown training status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "training_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TrainingType {
    Workshop,
    Drill,
    Seminar,
    FieldExercise,
    Simulation,
    AwarenessCampaign,
}

impl TrainingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingType::Workshop => "workshop",
            TrainingType::Drill => "drill",
            TrainingType::Seminar => "seminar",
            TrainingType::FieldExercise => "field_exercise",
            TrainingType::Simulation => "simulation",
            TrainingType::AwarenessCampaign => "awareness_campaign",
        }
    }

    /// Chart label, underscores replaced by spaces.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "workshop" => Ok(TrainingType::Workshop),
            "drill" => Ok(TrainingType::Drill),
            "seminar" => Ok(TrainingType::Seminar),
            "field_exercise" => Ok(TrainingType::FieldExercise),
            "simulation" => Ok(TrainingType::Simulation),
            "awareness_campaign" => Ok(TrainingType::AwarenessCampaign),
            _ => Err(format!("Unknown training type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "disaster_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisasterType {
    Earthquake,
    Flood,
    Cyclone,
    Fire,
    Landslide,
    Drought,
    Tsunami,
    Industrial,
    Other,
}

impl DisasterType {
    pub fn all() -> &'static [DisasterType] {
        &[
            DisasterType::Earthquake,
            DisasterType::Flood,
            DisasterType::Cyclone,
            DisasterType::Fire,
            DisasterType::Landslide,
            DisasterType::Drought,
            DisasterType::Tsunami,
            DisasterType::Industrial,
            DisasterType::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterType::Earthquake => "earthquake",
            DisasterType::Flood => "flood",
            DisasterType::Cyclone => "cyclone",
            DisasterType::Fire => "fire",
            DisasterType::Landslide => "landslide",
            DisasterType::Drought => "drought",
            DisasterType::Tsunami => "tsunami",
            DisasterType::Industrial => "industrial",
            DisasterType::Other => "other",
        }
    }
}

impl Display for DisasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisasterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisasterType::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown disaster type: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub training_type: TrainingType,
    pub disaster_types: Vec<DisasterType>,
    pub status: TrainingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub state: String,
    pub district: String,
    pub organizing_body: String,
    pub coordinator_id: Option<Uuid>,
    pub target_participants: i32,
    pub actual_participants: i32,
    pub budget: Option<f64>,
    pub created_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TrainingProgram {
    /// Coordinates as `(latitude, longitude)` when the program has both.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_new_training_program"))]
pub struct NewTrainingProgram {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub training_type: TrainingType,
    #[validate(length(min = 1, message = "Please select at least one disaster type"))]
    pub disaster_types: Vec<DisasterType>,
    #[serde(default)]
    pub status: TrainingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    #[validate(length(min = 1, message = "Location name is required"))]
    pub location_name: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "District is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "Organizing body is required"))]
    pub organizing_body: String,
    pub coordinator_id: Option<Uuid>,
    #[validate(range(min = 0, message = "Target participants cannot be negative"))]
    pub target_participants: i32,
    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: Option<f64>,
}

fn validate_new_training_program(program: &NewTrainingProgram) -> Result<(), ValidationError> {
    if program.start_date > program.end_date {
        return Err(ValidationError::new("date_order")
            .with_message("End date must not be before the start date".into()));
    }
    if program.latitude.is_some() != program.longitude.is_some() {
        return Err(ValidationError::new("coordinate_pair")
            .with_message("Latitude and longitude must be given together".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateTrainingStatus {
    pub status: TrainingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn new_program() -> NewTrainingProgram {
        NewTrainingProgram {
            title: "Earthquake Preparedness Workshop".to_string(),
            description: None,
            training_type: TrainingType::Workshop,
            disaster_types: vec![DisasterType::Earthquake],
            status: TrainingStatus::Planned,
            start_date: datetime!(2025-03-10 09:00 UTC),
            end_date: datetime!(2025-03-12 17:00 UTC),
            location_name: "Delhi Administrative Training Institute".to_string(),
            latitude: Some(28.6139),
            longitude: Some(77.2090),
            state: "Delhi".to_string(),
            district: "New Delhi".to_string(),
            organizing_body: "NDMA".to_string(),
            coordinator_id: None,
            target_participants: 150,
            budget: Some(500_000.0),
        }
    }

    #[test]
    fn valid_program_passes() {
        assert!(new_program().validate().is_ok());
    }

    #[test]
    fn empty_disaster_types_rejected() {
        let mut program = new_program();
        program.disaster_types.clear();
        let errors = program.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("disaster_types"));
    }

    #[test]
    fn lone_latitude_rejected() {
        let mut program = new_program();
        program.longitude = None;
        assert!(program.validate().is_err());
    }

    #[test]
    fn end_before_start_rejected() {
        let mut program = new_program();
        program.end_date = datetime!(2025-03-01 09:00 UTC);
        assert!(program.validate().is_err());
    }

    #[test]
    fn negative_budget_rejected() {
        let mut program = new_program();
        program.budget = Some(-1.0);
        assert!(program.validate().is_err());
    }

    #[test]
    fn enums_parse_from_wire_names() {
        assert_eq!("field_exercise".parse::<TrainingType>(), Ok(TrainingType::FieldExercise));
        assert_eq!("Ongoing".parse::<TrainingStatus>(), Ok(TrainingStatus::Ongoing));
        assert_eq!("tsunami".parse::<DisasterType>(), Ok(DisasterType::Tsunami));
        assert!("volcano".parse::<DisasterType>().is_err());
        assert_eq!(TrainingType::AwarenessCampaign.label(), "awareness campaign");
    }

    #[test]
    fn disaster_type_arrays_use_the_enum_array_type() {
        use sqlx::postgres::PgHasArrayType;
        use sqlx::TypeInfo;
        assert_eq!(
            <DisasterType as PgHasArrayType>::array_type_info().name(),
            "_disaster_type"
        );
    }
}
