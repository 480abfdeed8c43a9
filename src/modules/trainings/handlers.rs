use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::form::TrainingProgramForm;
use crate::app_state::AppState;
use crate::auth::CurrentProfile;
use crate::db::models::{
    AttendanceSummary, Participant, TrainingMetric, TrainingProgram, TrainingUpdateDetail,
    UpdateTrainingStatus,
};
use crate::db::repositories::{
    ParticipantRepository, ProgramFilter, TrainingRepository, UpdateRepository,
};
use crate::error::{AppError, AppResult};

/// Updates shown on the program detail view.
const DETAIL_UPDATES: i64 = 5;

#[derive(Debug, Serialize)]
pub struct TrainingDetailResponse {
    pub program: TrainingProgram,
    pub participants: Vec<Participant>,
    pub attendance: AttendanceSummary,
    pub recent_updates: Vec<TrainingUpdateDetail>,
}

pub async fn list_trainings(
    State(state): State<AppState>,
    Query(filter): Query<ProgramFilter>,
) -> AppResult<Json<Vec<TrainingProgram>>> {
    let programs = TrainingRepository::list_programs(&state.db, &filter).await?;
    Ok(Json(programs))
}

/// Programs currently running, as the active-trainings widget lists them.
pub async fn list_active_trainings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TrainingProgram>>> {
    let programs = TrainingRepository::list_programs(&state.db, &ProgramFilter::ongoing()).await?;
    Ok(Json(programs))
}

pub async fn create_training(
    State(state): State<AppState>,
    profile: CurrentProfile,
    Json(form): Json<TrainingProgramForm>,
) -> AppResult<(StatusCode, Json<TrainingProgram>)> {
    profile.require_training_creator()?;
    let new_program = form.into_new_program()?;

    let mut tx = state.db.begin().await?;
    let program = TrainingRepository::create_program(&mut tx, &new_program, profile.0.id).await?;
    tx.commit().await?;

    info!(program_id = %program.id, created_by = %profile.0.id, "Training program created");
    Ok((StatusCode::CREATED, Json(program)))
}

pub async fn get_training(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> AppResult<Json<TrainingDetailResponse>> {
    let program = TrainingRepository::get_program(&state.db, program_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Training program {}", program_id)))?;
    let participants = ParticipantRepository::list_for_program(&state.db, program_id).await?;
    let recent_updates =
        UpdateRepository::list_for_program(&state.db, program_id, Some(DETAIL_UPDATES)).await?;

    Ok(Json(TrainingDetailResponse {
        attendance: AttendanceSummary::from_participants(&participants),
        program,
        participants,
        recent_updates,
    }))
}

pub async fn update_training_status(
    State(state): State<AppState>,
    profile: CurrentProfile,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<UpdateTrainingStatus>,
) -> AppResult<Json<TrainingProgram>> {
    let mut tx = state.db.begin().await?;
    let program = TrainingRepository::update_status(&mut tx, program_id, payload.status).await?;
    tx.commit().await?;

    info!(
        program_id = %program.id,
        status = %program.status,
        changed_by = %profile.0.id,
        "Training status changed"
    );
    Ok(Json(program))
}

pub async fn list_training_metrics(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> AppResult<Json<Vec<TrainingMetric>>> {
    let metrics = UpdateRepository::list_metrics(&state.db, program_id).await?;
    Ok(Json(metrics))
}
