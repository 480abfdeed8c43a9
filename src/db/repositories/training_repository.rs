use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::db::models::{NewTrainingProgram, TrainingProgram, TrainingStatus};
use crate::db::DbResult;

const PROGRAM_COLUMNS: &str = "id, title, description, training_type, disaster_types, status, \
     start_date, end_date, location_name, latitude, longitude, state, district, organizing_body, \
     coordinator_id, target_participants, actual_participants, budget, created_by, created_at, updated_at";

/// Row filter for program listings. Results are always ordered by
/// `start_date` descending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramFilter {
    pub status: Option<TrainingStatus>,
    pub state: Option<String>,
    /// Case-insensitive match against title, location and district.
    pub search: Option<String>,
    /// Only programs that carry both coordinates.
    #[serde(default)]
    pub with_coordinates: bool,
    pub limit: Option<i64>,
}

impl ProgramFilter {
    pub fn ongoing() -> Self {
        Self {
            status: Some(TrainingStatus::Ongoing),
            ..Self::default()
        }
    }

    pub fn located() -> Self {
        Self {
            with_coordinates: true,
            ..Self::default()
        }
    }
}

/// Escapes `LIKE` wildcards so user search text matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn program_list_query(filter: &ProgramFilter) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM training_programs WHERE TRUE", PROGRAM_COLUMNS));

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(state) = filter.state.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND state = ").push_bind(state.to_string());
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        query
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR location_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR district ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if filter.with_coordinates {
        query.push(" AND latitude IS NOT NULL AND longitude IS NOT NULL");
    }

    query.push(" ORDER BY start_date DESC");

    if let Some(limit) = filter.limit {
        query.push(" LIMIT ").push_bind(limit.max(0));
    }

    query
}

pub struct TrainingRepository;

impl TrainingRepository {
    pub async fn list_programs(pool: &PgPool, filter: &ProgramFilter) -> DbResult<Vec<TrainingProgram>> {
        let mut query = program_list_query(filter);

        let programs = query
            .build_query_as::<TrainingProgram>()
            .fetch_all(pool)
            .await?;
        Ok(programs)
    }

    pub async fn get_program(pool: &PgPool, program_id: Uuid) -> DbResult<Option<TrainingProgram>> {
        let program = sqlx::query_as::<_, TrainingProgram>(&format!(
            "SELECT {} FROM training_programs WHERE id = $1",
            PROGRAM_COLUMNS
        ))
        .bind(program_id)
        .fetch_optional(pool)
        .await?;
        Ok(program)
    }

    pub async fn create_program(
        tx: &mut Transaction<'_, Postgres>,
        new_program: &NewTrainingProgram,
        created_by: Uuid,
    ) -> DbResult<TrainingProgram> {
        let program = sqlx::query_as::<_, TrainingProgram>(&format!(
            r#"
            INSERT INTO training_programs (
                title, description, training_type, disaster_types, status, start_date, end_date,
                location_name, latitude, longitude, state, district, organizing_body,
                coordinator_id, target_participants, budget, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {}
            "#,
            PROGRAM_COLUMNS
        ))
        .bind(&new_program.title)
        .bind(&new_program.description)
        .bind(new_program.training_type)
        .bind(&new_program.disaster_types)
        .bind(new_program.status)
        .bind(new_program.start_date)
        .bind(new_program.end_date)
        .bind(&new_program.location_name)
        .bind(new_program.latitude)
        .bind(new_program.longitude)
        .bind(&new_program.state)
        .bind(&new_program.district)
        .bind(&new_program.organizing_body)
        .bind(new_program.coordinator_id)
        .bind(new_program.target_participants)
        .bind(new_program.budget)
        .bind(created_by)
        .fetch_one(&mut **tx)
        .await?;
        Ok(program)
    }

    pub async fn update_status(
        tx: &mut Transaction<'_, Postgres>,
        program_id: Uuid,
        status: TrainingStatus,
    ) -> DbResult<TrainingProgram> {
        let program = sqlx::query_as::<_, TrainingProgram>(&format!(
            r#"
            UPDATE training_programs
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            PROGRAM_COLUMNS
        ))
        .bind(status)
        .bind(program_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(program)
    }

    /// Takes the row lock on a program so attendance edits on it run one
    /// after another.
    pub async fn lock_program(tx: &mut Transaction<'_, Postgres>, program_id: Uuid) -> DbResult<()> {
        sqlx::query("SELECT id FROM training_programs WHERE id = $1 FOR UPDATE")
            .bind(program_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(())
    }

    /// Sets `actual_participants` to the number of participants currently
    /// marked present, counted inside the same statement.
    pub async fn recount_actual_participants(
        tx: &mut Transaction<'_, Postgres>,
        program_id: Uuid,
    ) -> DbResult<i32> {
        let count: i32 = sqlx::query_scalar(
            r#"
            UPDATE training_programs
            SET actual_participants = (
                    SELECT COUNT(*)::INTEGER FROM participants
                    WHERE training_id = $1 AND attendance_status
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING actual_participants
            "#,
        )
        .bind(program_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }
}
