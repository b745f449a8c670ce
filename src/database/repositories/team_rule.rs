use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::{
    models::{TeamRuleInput, TeamTeleworkRule},
    utils::sql,
};

#[derive(Clone)]
pub struct TeamRuleRepository {
    pool: PgPool,
}

impl TeamRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &TeamRuleInput) -> Result<TeamTeleworkRule> {
        let now = Utc::now();

        let rule = sqlx::query_as::<_, TeamTeleworkRule>(&sql(r#"
            INSERT INTO
                team_telework_rules (
                    name,
                    description,
                    team_id,
                    department_id,
                    affected_user_ids,
                    exemptions,
                    required_mode,
                    recurrence,
                    is_active,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id, name, description, team_id, department_id, affected_user_ids,
                exemptions, required_mode, recurrence, is_active, created_at, updated_at
        "#))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.team_id)
        .bind(input.department_id)
        .bind(&input.affected_user_ids)
        .bind(&input.exemptions)
        .bind(input.required_mode)
        .bind(Json(&input.recurrence))
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(rule)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamTeleworkRule>> {
        let rule = sqlx::query_as::<_, TeamTeleworkRule>(
            r#"
            SELECT
                id, name, description, team_id, department_id, affected_user_ids,
                exemptions, required_mode, recurrence, is_active, created_at, updated_at
            FROM
                team_telework_rules
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    pub async fn list(&self) -> Result<Vec<TeamTeleworkRule>> {
        let rules = sqlx::query_as::<_, TeamTeleworkRule>(
            r#"
            SELECT
                id, name, description, team_id, department_id, affected_user_ids,
                exemptions, required_mode, recurrence, is_active, created_at, updated_at
            FROM
                team_telework_rules
            ORDER BY
                name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    /// Active rules naming the user in `affected_user_ids`. Date matching is
    /// the validator's job; exemptions are also evaluated there.
    pub async fn find_active_for_user(&self, user_id: Uuid) -> Result<Vec<TeamTeleworkRule>> {
        let rules = sqlx::query_as::<_, TeamTeleworkRule>(
            r#"
            SELECT
                id, name, description, team_id, department_id, affected_user_ids,
                exemptions, required_mode, recurrence, is_active, created_at, updated_at
            FROM
                team_telework_rules
            WHERE
                is_active = TRUE
                AND $1 = ANY (affected_user_ids)
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    pub async fn update(&self, id: Uuid, input: &TeamRuleInput) -> Result<Option<TeamTeleworkRule>> {
        let now = Utc::now();

        let rule = sqlx::query_as::<_, TeamTeleworkRule>(&sql(r#"
            UPDATE
                team_telework_rules
            SET
                name = ?,
                description = ?,
                team_id = ?,
                department_id = ?,
                affected_user_ids = ?,
                exemptions = ?,
                required_mode = ?,
                recurrence = ?,
                is_active = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id, name, description, team_id, department_id, affected_user_ids,
                exemptions, required_mode, recurrence, is_active, created_at, updated_at
        "#))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.team_id)
        .bind(input.department_id)
        .bind(&input.affected_user_ids)
        .bind(&input.exemptions)
        .bind(input.required_mode)
        .bind(Json(&input.recurrence))
        .bind(input.is_active)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM team_telework_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
