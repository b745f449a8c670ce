use anyhow::{Result, anyhow};
use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::{
    models::{
        TeleworkConstraints, TeleworkMode, UpdateProfileInput, UserTeleworkProfile, WeeklyPattern,
    },
    utils::sql,
};

#[derive(Clone)]
pub struct TeleworkProfileRepository {
    pool: PgPool,
}

impl TeleworkProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserTeleworkProfile>> {
        let profile = sqlx::query_as::<_, UserTeleworkProfile>(
            r#"
            SELECT
                user_id, display_name, default_mode, weekly_pattern, constraints,
                is_active, created_by, updated_by, created_at, updated_at
            FROM
                telework_profiles
            WHERE
                user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        display_name: &str,
        default_mode: TeleworkMode,
        weekly_pattern: &WeeklyPattern,
        constraints: &TeleworkConstraints,
        created_by: Option<Uuid>,
    ) -> Result<UserTeleworkProfile> {
        let now = Utc::now();

        let profile = sqlx::query_as::<_, UserTeleworkProfile>(&sql(r#"
            INSERT INTO
                telework_profiles (
                    user_id,
                    display_name,
                    default_mode,
                    weekly_pattern,
                    constraints,
                    is_active,
                    created_by,
                    updated_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, TRUE, ?, ?, ?, ?)
            RETURNING
                user_id, display_name, default_mode, weekly_pattern, constraints,
                is_active, created_by, updated_by, created_at, updated_at
        "#))
        .bind(user_id)
        .bind(display_name)
        .bind(default_mode)
        .bind(Json(weekly_pattern))
        .bind(Json(constraints))
        .bind(created_by)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Lazy creation with stock defaults. `ON CONFLICT DO NOTHING` plus the
    /// re-select makes concurrent first reads converge on a single row.
    pub async fn get_or_create(
        &self,
        user_id: Uuid,
        display_name: &str,
        created_by: Option<Uuid>,
    ) -> Result<UserTeleworkProfile> {
        let now = Utc::now();

        sqlx::query(&sql(r#"
            INSERT INTO
                telework_profiles (
                    user_id,
                    display_name,
                    default_mode,
                    weekly_pattern,
                    constraints,
                    is_active,
                    created_by,
                    updated_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, TRUE, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
        "#))
        .bind(user_id)
        .bind(display_name)
        .bind(TeleworkMode::OnSite)
        .bind(Json(WeeklyPattern::default()))
        .bind(Json(TeleworkConstraints::default()))
        .bind(created_by)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("telework profile missing after insert for user {}", user_id))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        input: &UpdateProfileInput,
        updated_by: Option<Uuid>,
    ) -> Result<Option<UserTeleworkProfile>> {
        let now = Utc::now();

        let profile = sqlx::query_as::<_, UserTeleworkProfile>(&sql(r#"
            UPDATE
                telework_profiles
            SET
                display_name = COALESCE(?, display_name),
                default_mode = COALESCE(?, default_mode),
                weekly_pattern = COALESCE(?, weekly_pattern),
                constraints = COALESCE(?, constraints),
                is_active = COALESCE(?, is_active),
                updated_by = ?,
                updated_at = ?
            WHERE
                user_id = ?
            RETURNING
                user_id, display_name, default_mode, weekly_pattern, constraints,
                is_active, created_by, updated_by, created_at, updated_at
        "#))
        .bind(&input.display_name)
        .bind(input.default_mode)
        .bind(input.weekly_pattern.as_ref().map(Json))
        .bind(input.constraints.as_ref().map(Json))
        .bind(input.is_active)
        .bind(updated_by)
        .bind(now)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
