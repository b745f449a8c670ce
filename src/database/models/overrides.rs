use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::profile::TeleworkMode;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ApprovalStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// A single day's declared exception to the user's default telework pattern.
/// The id is the composite key: one row per (user, date), requesting the same
/// day again overwrites the previous declaration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeleworkOverride {
    pub id: String,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mode: TeleworkMode,
    pub reason: Option<String>,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deterministic override id: same user and day always map to the same row.
pub fn generate_override_id(user_id: Uuid, date: NaiveDate) -> String {
    format!("{}_{}", user_id, date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequestInput {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mode: TeleworkMode,
    pub reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOverrideInput {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub requested_mode: TeleworkMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectOverrideInput {
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<ApprovalStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn override_id_is_deterministic() {
        let user_id = Uuid::nil();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let first = generate_override_id(user_id, date);
        let second = generate_override_id(user_id, date);
        assert_eq!(first, second);
        assert_eq!(
            first,
            "00000000-0000-0000-0000-000000000000_2025-06-02"
        );
    }

    #[test]
    fn approval_status_round_trips_through_strings() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<ApprovalStatus>(), Ok(status));
        }
    }
}
