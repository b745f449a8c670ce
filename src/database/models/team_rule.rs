use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::profile::TeleworkMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecurrence {
    /// ISO weekday, 1 = Monday through 7 = Sunday.
    pub day_of_week: u8,
}

/// When a rule fires. Kinds this version does not understand deserialize to
/// `Unknown` and are never active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    #[serde(rename_all = "camelCase")]
    Weekly { weekly_pattern: WeeklyRecurrence },
    #[serde(rename_all = "camelCase")]
    SpecificDates { specific_dates: Vec<NaiveDate> },
    #[serde(other)]
    Unknown,
}

/// A recurring mode constraint applied to a set of users, with per-user
/// exemptions. Read-only from the validator's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamTeleworkRule {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub affected_user_ids: Vec<Uuid>,
    pub exemptions: Vec<Uuid>,
    pub required_mode: TeleworkMode,
    pub recurrence: Json<Recurrence>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamTeleworkRule {
    pub fn affects(&self, user_id: Uuid) -> bool {
        self.affected_user_ids.contains(&user_id)
    }

    pub fn exempts(&self, user_id: Uuid) -> bool {
        self.exemptions.contains(&user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRuleInput {
    pub name: String,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub affected_user_ids: Vec<Uuid>,
    #[serde(default)]
    pub exemptions: Vec<Uuid>,
    pub required_mode: TeleworkMode,
    pub recurrence: Recurrence,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn weekly_recurrence_round_trips() {
        let recurrence = Recurrence::Weekly {
            weekly_pattern: WeeklyRecurrence { day_of_week: 5 },
        };
        let json = serde_json::to_value(&recurrence).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "weekly", "weeklyPattern": {"dayOfWeek": 5}})
        );
        let back: Recurrence = serde_json::from_value(json).unwrap();
        assert_eq!(back, recurrence);
    }

    #[test]
    fn specific_dates_recurrence_round_trips() {
        let json = serde_json::json!({
            "type": "specific_dates",
            "specificDates": ["2025-12-24", "2025-12-31"]
        });
        let recurrence: Recurrence = serde_json::from_value(json).unwrap();
        match recurrence {
            Recurrence::SpecificDates { ref specific_dates } => {
                assert_eq!(specific_dates.len(), 2)
            }
            ref other => panic!("unexpected recurrence: {:?}", other),
        }
    }

    #[test]
    fn unrecognized_kind_deserializes_to_unknown() {
        let json = serde_json::json!({"type": "monthly", "dayOfMonth": 1});
        let recurrence: Recurrence = serde_json::from_value(json).unwrap();
        assert_eq!(recurrence, Recurrence::Unknown);
    }
}
