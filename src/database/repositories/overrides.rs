use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{ApprovalStatus, OverrideRequestInput, TeleworkOverride},
    utils::sql,
};

#[derive(Clone)]
pub struct OverrideRepository {
    pool: PgPool,
}

impl OverrideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert-or-overwrite on the composite `{user_id}_{date}` key. Two
    /// concurrent requests for the same day resolve through the store's
    /// upsert atomicity: last write wins. An overwrite replaces mode, reason
    /// and approval state; it never carries a previous decision over.
    pub async fn upsert(
        &self,
        id: &str,
        input: &OverrideRequestInput,
        approval_status: ApprovalStatus,
        approved_by: Option<Uuid>,
        approved_at: Option<DateTime<Utc>>,
        actor_id: Option<Uuid>,
    ) -> Result<TeleworkOverride> {
        let now = Utc::now();

        let override_row = sqlx::query_as::<_, TeleworkOverride>(&sql(r#"
            INSERT INTO
                telework_overrides (
                    id,
                    user_id,
                    date,
                    mode,
                    reason,
                    approval_status,
                    approved_by,
                    approved_at,
                    rejection_reason,
                    expires_at,
                    created_by,
                    updated_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                mode = EXCLUDED.mode,
                reason = EXCLUDED.reason,
                approval_status = EXCLUDED.approval_status,
                approved_by = EXCLUDED.approved_by,
                approved_at = EXCLUDED.approved_at,
                rejection_reason = NULL,
                expires_at = EXCLUDED.expires_at,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING
                id, user_id, date, mode, reason, approval_status, approved_by,
                approved_at, rejection_reason, expires_at, created_by, updated_by,
                created_at, updated_at
        "#))
        .bind(id)
        .bind(input.user_id)
        .bind(input.date)
        .bind(input.mode)
        .bind(&input.reason)
        .bind(approval_status)
        .bind(approved_by)
        .bind(approved_at)
        .bind(input.expires_at)
        .bind(actor_id)
        .bind(actor_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(override_row)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<TeleworkOverride>> {
        let override_row = sqlx::query_as::<_, TeleworkOverride>(
            r#"
            SELECT
                id, user_id, date, mode, reason, approval_status, approved_by,
                approved_at, rejection_reason, expires_at, created_by, updated_by,
                created_at, updated_at
            FROM
                telework_overrides
            WHERE
                id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(override_row)
    }

    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<ApprovalStatus>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<TeleworkOverride>> {
        let rows = sqlx::query_as::<_, TeleworkOverride>(
            r#"
            SELECT
                id, user_id, date, mode, reason, approval_status, approved_by,
                approved_at, rejection_reason, expires_at, created_by, updated_by,
                created_at, updated_at
            FROM
                telework_overrides
            WHERE
                ($1::uuid IS NULL OR user_id = $1)
                AND ($2::varchar IS NULL OR approval_status = $2)
                AND ($3::date IS NULL OR date >= $3)
                AND ($4::date IS NULL OR date <= $4)
            ORDER BY
                date DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Records a one-way approval decision. The caller checks the PENDING
    /// precondition; approval passes no reason, which clears any stale one.
    pub async fn set_decision(
        &self,
        id: &str,
        status: ApprovalStatus,
        decided_by: Uuid,
        rejection_reason: Option<&str>,
    ) -> Result<TeleworkOverride> {
        let now = Utc::now();

        let override_row = sqlx::query_as::<_, TeleworkOverride>(&sql(r#"
            UPDATE
                telework_overrides
            SET
                approval_status = ?,
                approved_by = ?,
                approved_at = ?,
                rejection_reason = ?,
                updated_by = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id, user_id, date, mode, reason, approval_status, approved_by,
                approved_at, rejection_reason, expires_at, created_by, updated_by,
                created_at, updated_at
        "#))
        .bind(status)
        .bind(decided_by)
        .bind(now)
        .bind(rejection_reason)
        .bind(decided_by)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(override_row)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM telework_overrides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM telework_overrides WHERE expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
