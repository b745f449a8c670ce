use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::macros::string_enum;

/// Policy defaults applied when a profile's constraints leave a field unset.
/// Operators tune these per deployment; keep them named, not inlined.
pub const DEFAULT_MAX_REMOTE_DAYS_PER_WEEK: i32 = 2;
pub const DEFAULT_MAX_CONSECUTIVE_REMOTE_DAYS: i32 = 2;
pub const DEFAULT_REQUIRES_APPROVAL: bool = false;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TeleworkMode {
        OnSite => "on_site",
        Remote => "remote",
        Hybrid => "hybrid",
    }
}

/// Declared mode per weekday; an unset day falls back to the profile default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyPattern {
    pub monday: Option<TeleworkMode>,
    pub tuesday: Option<TeleworkMode>,
    pub wednesday: Option<TeleworkMode>,
    pub thursday: Option<TeleworkMode>,
    pub friday: Option<TeleworkMode>,
    pub saturday: Option<TeleworkMode>,
    pub sunday: Option<TeleworkMode>,
}

impl WeeklyPattern {
    pub fn mode_for(&self, weekday: Weekday) -> Option<TeleworkMode> {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeleworkConstraints {
    pub max_remote_days_per_week: Option<i32>,
    /// Stored for data compatibility; validation does not enforce it.
    pub max_consecutive_remote_days: Option<i32>,
    pub requires_approval: Option<bool>,
}

impl TeleworkConstraints {
    pub fn max_remote_days_per_week(&self) -> i32 {
        self.max_remote_days_per_week
            .unwrap_or(DEFAULT_MAX_REMOTE_DAYS_PER_WEEK)
    }

    pub fn max_consecutive_remote_days(&self) -> i32 {
        self.max_consecutive_remote_days
            .unwrap_or(DEFAULT_MAX_CONSECUTIVE_REMOTE_DAYS)
    }

    pub fn requires_approval(&self) -> bool {
        self.requires_approval.unwrap_or(DEFAULT_REQUIRES_APPROVAL)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserTeleworkProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub default_mode: TeleworkMode,
    pub weekly_pattern: Json<WeeklyPattern>,
    pub constraints: Json<TeleworkConstraints>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileInput {
    pub user_id: Uuid,
    /// Falls back to the directory name when omitted.
    pub display_name: Option<String>,
    pub default_mode: Option<TeleworkMode>,
    pub weekly_pattern: Option<WeeklyPattern>,
    pub constraints: Option<TeleworkConstraints>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub default_mode: Option<TeleworkMode>,
    pub weekly_pattern: Option<WeeklyPattern>,
    pub constraints: Option<TeleworkConstraints>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mode_parses_from_wire_strings() {
        assert_eq!("remote".parse::<TeleworkMode>(), Ok(TeleworkMode::Remote));
        assert_eq!("ON_SITE".parse::<TeleworkMode>(), Ok(TeleworkMode::OnSite));
        assert!("office".parse::<TeleworkMode>().is_err());
    }

    #[test]
    fn constraints_fall_back_to_policy_defaults() {
        let constraints = TeleworkConstraints::default();
        assert_eq!(constraints.max_remote_days_per_week(), 2);
        assert_eq!(constraints.max_consecutive_remote_days(), 2);
        assert!(!constraints.requires_approval());

        let custom = TeleworkConstraints {
            max_remote_days_per_week: Some(3),
            requires_approval: Some(true),
            ..Default::default()
        };
        assert_eq!(custom.max_remote_days_per_week(), 3);
        assert!(custom.requires_approval());
    }

    #[test]
    fn weekly_pattern_deserializes_partial_objects() {
        let pattern: WeeklyPattern =
            serde_json::from_str(r#"{"monday":"remote","friday":"on_site"}"#).unwrap();
        assert_eq!(pattern.mode_for(Weekday::Mon), Some(TeleworkMode::Remote));
        assert_eq!(pattern.mode_for(Weekday::Fri), Some(TeleworkMode::OnSite));
        assert_eq!(pattern.mode_for(Weekday::Wed), None);
    }
}
