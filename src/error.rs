use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => StatusCode::NOT_FOUND,
                DatabaseError::Duplicate => StatusCode::CONFLICT,
                DatabaseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                DatabaseError::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::from(err))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_message(&errors))
    }
}

/// Flattens validator output into one line, using each rule's message where
/// it has one.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{} is invalid", field)),
            }
        }
    }
    if messages.is_empty() {
        messages.push("Invalid input".to_string());
    }
    messages.sort();
    messages.join("; ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::Database(DatabaseError::NotFound) => "Resource not found",
            AppError::Database(DatabaseError::Duplicate) => "Resource already exists",
            AppError::Database(DatabaseError::InvalidInput(_)) => "Invalid input data",
            AppError::Database(DatabaseError::Sqlx(err)) => {
                tracing::error!("Database query failed: {}", err);
                "An internal server error occurred"
            }
            AppError::Authentication(_) => "Authentication failed",
            AppError::Authorization(_) => "Access denied",
            AppError::Validation(_) => "Validation error",
            AppError::NotFound(_) => "Resource not found",
            AppError::BadRequest(_) => "Bad request",
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "Please select at least one disaster type"))]
        disaster_types: Vec<String>,
    }

    #[test]
    fn validation_errors_keep_rule_messages() {
        let errors = Form { disaster_types: vec![] }.validate().unwrap_err();
        let err = AppError::from(errors);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Please select at least one disaster type");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::Database(DatabaseError::NotFound).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Database(DatabaseError::Duplicate).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Authorization("field_officer".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::from(sqlx::Error::RowNotFound).status_code(), StatusCode::NOT_FOUND);
    }
}
