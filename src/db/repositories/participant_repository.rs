use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{NewParticipant, Participant};
use crate::db::DbResult;

const PARTICIPANT_COLUMNS: &str = "id, training_id, name, email, phone, organization, designation, \
     attendance_status, feedback_rating, feedback_comments, created_at";

pub struct ParticipantRepository;

impl ParticipantRepository {
    pub async fn list_for_program(pool: &PgPool, training_id: Uuid) -> DbResult<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {} FROM participants WHERE training_id = $1 ORDER BY created_at DESC",
            PARTICIPANT_COLUMNS
        ))
        .bind(training_id)
        .fetch_all(pool)
        .await?;
        Ok(participants)
    }

    pub async fn get_participant(pool: &PgPool, participant_id: Uuid) -> DbResult<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {} FROM participants WHERE id = $1",
            PARTICIPANT_COLUMNS
        ))
        .bind(participant_id)
        .fetch_optional(pool)
        .await?;
        Ok(participant)
    }

    pub async fn create_participant(
        tx: &mut Transaction<'_, Postgres>,
        training_id: Uuid,
        new_participant: &NewParticipant,
    ) -> DbResult<Participant> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            r#"
            INSERT INTO participants (
                training_id, name, email, phone, organization, designation,
                feedback_rating, feedback_comments
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PARTICIPANT_COLUMNS
        ))
        .bind(training_id)
        .bind(&new_participant.name)
        .bind(&new_participant.email)
        .bind(&new_participant.phone)
        .bind(&new_participant.organization)
        .bind(&new_participant.designation)
        .bind(new_participant.feedback_rating)
        .bind(&new_participant.feedback_comments)
        .fetch_one(&mut **tx)
        .await?;
        Ok(participant)
    }

    /// Flips the stored attendance flag and returns the updated row.
    pub async fn toggle_attendance(
        tx: &mut Transaction<'_, Postgres>,
        participant_id: Uuid,
    ) -> DbResult<Participant> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            r#"
            UPDATE participants
            SET attendance_status = NOT attendance_status
            WHERE id = $1
            RETURNING {}
            "#,
            PARTICIPANT_COLUMNS
        ))
        .bind(participant_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(participant)
    }
}
