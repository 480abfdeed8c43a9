use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{NewTrainingUpdate, TrainingMetric, TrainingUpdate, TrainingUpdateDetail};
use crate::db::DbResult;

const UPDATE_COLUMNS: &str = "id, training_id, update_type, message, images, posted_by, created_at";

const UPDATE_DETAIL_SELECT: &str = r#"
    SELECT u.id, u.training_id, u.update_type, u.message, u.images, u.posted_by, u.created_at,
           t.title AS training_title, t.location_name, t.state,
           p.full_name AS poster_name
    FROM training_updates u
    LEFT JOIN training_programs t ON t.id = u.training_id
    LEFT JOIN profiles p ON p.id = u.posted_by
"#;

pub struct UpdateRepository;

impl UpdateRepository {
    pub async fn create_update(
        tx: &mut Transaction<'_, Postgres>,
        training_id: Uuid,
        posted_by: Uuid,
        new_update: &NewTrainingUpdate,
    ) -> DbResult<TrainingUpdate> {
        let update = sqlx::query_as::<_, TrainingUpdate>(&format!(
            r#"
            INSERT INTO training_updates (training_id, update_type, message, images, posted_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            UPDATE_COLUMNS
        ))
        .bind(training_id)
        .bind(new_update.update_type.trim())
        .bind(&new_update.message)
        .bind(&new_update.images)
        .bind(posted_by)
        .fetch_one(&mut **tx)
        .await?;
        Ok(update)
    }

    pub async fn list_for_program(
        pool: &PgPool,
        training_id: Uuid,
        limit: Option<i64>,
    ) -> DbResult<Vec<TrainingUpdateDetail>> {
        let updates = sqlx::query_as::<_, TrainingUpdateDetail>(&format!(
            "{} WHERE u.training_id = $1 ORDER BY u.created_at DESC LIMIT $2",
            UPDATE_DETAIL_SELECT
        ))
        .bind(training_id)
        .bind(limit.map(|l| l.max(0)))
        .fetch_all(pool)
        .await?;
        Ok(updates)
    }

    /// Most recent updates across all programs, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> DbResult<Vec<TrainingUpdateDetail>> {
        let updates = sqlx::query_as::<_, TrainingUpdateDetail>(&format!(
            "{} ORDER BY u.created_at DESC LIMIT $1",
            UPDATE_DETAIL_SELECT
        ))
        .bind(limit.max(0))
        .fetch_all(pool)
        .await?;
        Ok(updates)
    }

    /// Re-fetches one update with its program and poster display fields.
    pub async fn get_detail(pool: &PgPool, update_id: Uuid) -> DbResult<Option<TrainingUpdateDetail>> {
        let update = sqlx::query_as::<_, TrainingUpdateDetail>(&format!(
            "{} WHERE u.id = $1",
            UPDATE_DETAIL_SELECT
        ))
        .bind(update_id)
        .fetch_optional(pool)
        .await?;
        Ok(update)
    }

    pub async fn list_metrics(pool: &PgPool, training_id: Uuid) -> DbResult<Vec<TrainingMetric>> {
        let metrics = sqlx::query_as::<_, TrainingMetric>(
            r#"
            SELECT id, training_id, metric_name, metric_value, recorded_at
            FROM training_metrics
            WHERE training_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(training_id)
        .fetch_all(pool)
        .await?;
        Ok(metrics)
    }
}
