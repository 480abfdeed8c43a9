use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::CurrentProfile;
use crate::db::models::{NewTrainingUpdate, TrainingUpdateDetail};
use crate::db::repositories::{TrainingRepository, UpdateRepository};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LimitQuery {
    #[validate(range(min = 0, message = "Limit cannot be negative"))]
    pub limit: Option<i64>,
}

pub async fn list_program_updates(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<TrainingUpdateDetail>>> {
    query.validate()?;
    let updates = UpdateRepository::list_for_program(&state.db, program_id, query.limit).await?;
    Ok(Json(updates))
}

pub async fn post_update(
    State(state): State<AppState>,
    profile: CurrentProfile,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<NewTrainingUpdate>,
) -> AppResult<(StatusCode, Json<TrainingUpdateDetail>)> {
    payload.validate()?;
    TrainingRepository::get_program(&state.db, program_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Training program {}", program_id)))?;

    let mut tx = state.db.begin().await?;
    let update = UpdateRepository::create_update(&mut tx, program_id, profile.0.id, &payload).await?;
    tx.commit().await?;

    info!(
        update_id = %update.id,
        program_id = %program_id,
        update_type = %update.update_type,
        "Field update posted"
    );

    let detail = UpdateRepository::get_detail(&state.db, update.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Update {}", update.id)))?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Notifications listing across all programs, newest first.
pub async fn list_recent_updates(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<TrainingUpdateDetail>>> {
    query.validate()?;
    let limit = query.limit.unwrap_or(state.env.feed.notifications_limit);
    let updates = UpdateRepository::list_recent(&state.db, limit).await?;
    Ok(Json(updates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_limit_is_rejected() {
        let err = AppError::from(LimitQuery { limit: Some(-1) }.validate().unwrap_err());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Limit cannot be negative");
    }

    #[test]
    fn missing_or_zero_limit_is_accepted() {
        assert!(LimitQuery { limit: None }.validate().is_ok());
        assert!(LimitQuery { limit: Some(0) }.validate().is_ok());
    }
}
