use anyhow::Result;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::database::{
    models::{Activity, CreateActivityInput},
    utils::sql,
};

#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn log_activity(&self, input: CreateActivityInput) -> Result<()> {
        sqlx::query(&sql(r#"
            INSERT INTO
                activities (user_id, entity_type, entity_id, action, description, metadata)
            VALUES
                (?, ?, ?, ?, ?, ?)
        "#))
        .bind(input.user_id)
        .bind(&input.entity_type)
        .bind(&input.entity_id)
        .bind(&input.action)
        .bind(&input.description)
        .bind(input.metadata.map(Json))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT
                id, user_id, entity_type, entity_id, action, description, metadata, created_at
            FROM
                activities
            ORDER BY
                created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }
}
