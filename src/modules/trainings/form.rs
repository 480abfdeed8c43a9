use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{DisasterType, NewTrainingProgram, TrainingStatus, TrainingType};
use crate::error::{AppError, AppResult};

/// Program registration as submitted by the create form: numbers, dates and
/// enums arrive as text and optional fields may be blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrainingProgramForm {
    pub title: String,
    pub description: String,
    pub training_type: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub location_name: String,
    pub latitude: String,
    pub longitude: String,
    pub state: String,
    pub district: String,
    pub organizing_body: String,
    pub coordinator_id: Option<Uuid>,
    pub target_participants: String,
    pub budget: String,
    pub disaster_types: Vec<String>,
}

impl TrainingProgramForm {
    /// Parses and validates the form. Nothing is written on failure.
    pub fn into_new_program(self) -> AppResult<NewTrainingProgram> {
        let training_type = if self.training_type.trim().is_empty() {
            TrainingType::Workshop
        } else {
            self.training_type.parse().map_err(AppError::Validation)?
        };
        let status = if self.status.trim().is_empty() {
            TrainingStatus::default()
        } else {
            self.status.parse().map_err(AppError::Validation)?
        };
        let disaster_types = self
            .disaster_types
            .iter()
            .map(|d| d.parse::<DisasterType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Validation)?;

        let program = NewTrainingProgram {
            title: self.title.trim().to_string(),
            description: non_blank(self.description),
            training_type,
            disaster_types,
            status,
            start_date: parse_form_datetime("Start date", &self.start_date)?,
            end_date: parse_form_datetime("End date", &self.end_date)?,
            location_name: self.location_name.trim().to_string(),
            latitude: parse_optional_number("Latitude", &self.latitude)?,
            longitude: parse_optional_number("Longitude", &self.longitude)?,
            state: self.state.trim().to_string(),
            district: self.district.trim().to_string(),
            organizing_body: self.organizing_body.trim().to_string(),
            coordinator_id: self.coordinator_id,
            target_participants: self.target_participants.trim().parse().map_err(|_| {
                AppError::Validation("Target participants must be a whole number".to_string())
            })?,
            budget: parse_optional_number("Budget", &self.budget)?,
        };
        program.validate()?;
        Ok(program)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_optional_number(field: &str, value: &str) -> AppResult<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Some)
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", field)))
}

/// Accepts RFC 3339, a `datetime-local` value (`2025-03-10T09:00`, read as
/// UTC) or a bare date.
pub fn parse_form_datetime(field: &str, value: &str) -> AppResult<OffsetDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed);
    }
    let local_minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let local_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, &local_minutes)
        .or_else(|_| PrimitiveDateTime::parse(trimmed, &local_seconds))
    {
        return Ok(parsed.assume_utc());
    }
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }
    Err(AppError::Validation(format!("{} is not a valid date: {}", field, trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    fn form() -> TrainingProgramForm {
        TrainingProgramForm {
            title: "Flood Rescue Drill".to_string(),
            training_type: "drill".to_string(),
            start_date: "2025-07-01T09:00".to_string(),
            end_date: "2025-07-02T17:30".to_string(),
            location_name: "Guwahati".to_string(),
            latitude: "26.1445".to_string(),
            longitude: "91.7362".to_string(),
            state: "Assam".to_string(),
            district: "Kamrup".to_string(),
            organizing_body: "ASDMA".to_string(),
            target_participants: "80".to_string(),
            disaster_types: vec!["flood".to_string(), "landslide".to_string()],
            ..TrainingProgramForm::default()
        }
    }

    #[test]
    fn parses_complete_form() {
        let program = form().into_new_program().unwrap();
        assert_eq!(program.training_type, TrainingType::Drill);
        assert_eq!(program.status, TrainingStatus::Planned);
        assert_eq!(program.disaster_types, vec![DisasterType::Flood, DisasterType::Landslide]);
        assert_eq!(program.start_date, datetime!(2025-07-01 09:00 UTC));
        assert_eq!(program.latitude, Some(26.1445));
        assert_eq!(program.target_participants, 80);
        assert_eq!(program.budget, None);
        assert_eq!(program.description, None);
    }

    #[test]
    fn empty_disaster_types_are_rejected() {
        let mut input = form();
        input.disaster_types.clear();
        let err = input.into_new_program().unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one disaster type");
    }

    #[rstest]
    #[case::bad_target("target_participants", "eighty")]
    #[case::bad_latitude("latitude", "north")]
    #[case::bad_budget("budget", "5 lakh")]
    #[case::bad_date("start_date", "next monday")]
    #[case::unknown_type("training_type", "webinar")]
    fn unparsable_fields_are_validation_errors(#[case] field: &str, #[case] value: &str) {
        let mut input = form();
        let value = value.to_string();
        match field {
            "target_participants" => input.target_participants = value,
            "latitude" => input.latitude = value,
            "budget" => input.budget = value,
            "start_date" => input.start_date = value,
            "training_type" => input.training_type = value,
            _ => unreachable!(),
        }
        assert!(matches!(input.into_new_program(), Err(AppError::Validation(_))));
    }

    #[test]
    fn lone_coordinate_is_rejected() {
        let mut input = form();
        input.longitude.clear();
        assert!(input.into_new_program().is_err());
    }

    #[rstest]
    #[case("2025-03-10T09:00", datetime!(2025-03-10 09:00 UTC))]
    #[case("2025-03-10T09:00:30", datetime!(2025-03-10 09:00:30 UTC))]
    #[case("2025-03-10T09:00:00+05:30", datetime!(2025-03-10 09:00 +05:30))]
    #[case("2025-03-10", datetime!(2025-03-10 00:00 UTC))]
    fn form_datetimes(#[case] input: &str, #[case] expected: OffsetDateTime) {
        assert_eq!(parse_form_datetime("Start date", input).unwrap(), expected);
    }
}
