use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Profile;
use crate::db::DbResult;

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn get_profile(pool: &PgPool, profile_id: Uuid) -> DbResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, email, full_name, role, organization, state, district, phone, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;
        Ok(profile)
    }
}
