use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::CurrentProfile;
use crate::db::models::{AttendanceSummary, NewParticipant, Participant};
use crate::db::repositories::{ParticipantRepository, TrainingRepository};
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct ParticipantListResponse {
    pub participants: Vec<Participant>,
    pub attendance: AttendanceSummary,
}

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub participant: Participant,
    /// The program's present count after the toggle.
    pub actual_participants: i32,
}

async fn ensure_program_exists(state: &AppState, program_id: Uuid) -> AppResult<()> {
    TrainingRepository::get_program(&state.db, program_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Training program {}", program_id)))
}

pub async fn list_participants(
    State(state): State<AppState>,
    Path(program_id): Path<Uuid>,
) -> AppResult<Json<ParticipantListResponse>> {
    ensure_program_exists(&state, program_id).await?;
    let participants = ParticipantRepository::list_for_program(&state.db, program_id).await?;
    Ok(Json(ParticipantListResponse {
        attendance: AttendanceSummary::from_participants(&participants),
        participants,
    }))
}

pub async fn register_participant(
    State(state): State<AppState>,
    profile: CurrentProfile,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<NewParticipant>,
) -> AppResult<(StatusCode, Json<Participant>)> {
    payload.validate()?;
    ensure_program_exists(&state, program_id).await?;

    let mut tx = state.db.begin().await?;
    let participant = ParticipantRepository::create_participant(&mut tx, program_id, &payload).await?;
    tx.commit().await?;

    info!(
        participant_id = %participant.id,
        program_id = %program_id,
        registered_by = %profile.0.id,
        "Participant registered"
    );
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Flips a participant's attendance and recounts the program's
/// `actual_participants` in the same transaction, holding the program row
/// lock so concurrent toggles on one program serialize.
pub async fn toggle_attendance(
    State(state): State<AppState>,
    profile: CurrentProfile,
    Path(participant_id): Path<Uuid>,
) -> AppResult<Json<AttendanceResponse>> {
    let existing = ParticipantRepository::get_participant(&state.db, participant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Participant {}", participant_id)))?;

    let mut tx = state.db.begin().await?;
    TrainingRepository::lock_program(&mut tx, existing.training_id).await?;
    let participant = ParticipantRepository::toggle_attendance(&mut tx, participant_id).await?;
    let actual_participants =
        TrainingRepository::recount_actual_participants(&mut tx, existing.training_id).await?;
    tx.commit().await?;

    info!(
        participant_id = %participant.id,
        present = participant.attendance_status,
        actual_participants,
        marked_by = %profile.0.id,
        "Attendance updated"
    );
    Ok(Json(AttendanceResponse {
        participant,
        actual_participants,
    }))
}
