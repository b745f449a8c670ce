use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use sqlx::types::Json;
use uuid::Uuid;

use orchestra_be::database::models::{
    ApprovalStatus, ConflictSeverity, ConflictType, Recurrence, TeamTeleworkRule,
    TeleworkConstraints, TeleworkMode, TeleworkOverride, UserTeleworkProfile, ValidationResult,
    WEEKLY_LIMIT_SOURCE, WeeklyPattern, WeeklyRecurrence, generate_override_id,
};
use orchestra_be::services::telework::{evaluate_request, rule_applies_on, week_bounds};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn profile(user_id: Uuid) -> UserTeleworkProfile {
    let now = Utc::now();
    UserTeleworkProfile {
        user_id,
        display_name: "Marie Leclerc".to_string(),
        default_mode: TeleworkMode::Hybrid,
        weekly_pattern: Json(WeeklyPattern::default()),
        constraints: Json(TeleworkConstraints {
            max_remote_days_per_week: Some(2),
            ..Default::default()
        }),
        is_active: true,
        created_by: None,
        updated_by: None,
        created_at: now,
        updated_at: now,
    }
}

fn approved_remote(user_id: Uuid, day: NaiveDate) -> TeleworkOverride {
    let now = Utc::now();
    TeleworkOverride {
        id: generate_override_id(user_id, day),
        user_id,
        date: day,
        mode: TeleworkMode::Remote,
        reason: Some("focus day".to_string()),
        approval_status: ApprovalStatus::Approved,
        approved_by: Some(user_id),
        approved_at: Some(now),
        rejection_reason: None,
        expires_at: None,
        created_by: Some(user_id),
        updated_by: Some(user_id),
        created_at: now,
        updated_at: now,
    }
}

fn friday_on_site_rule(affected: Vec<Uuid>) -> TeamTeleworkRule {
    let now = Utc::now();
    TeamTeleworkRule {
        id: Uuid::new_v4(),
        name: "On-site Fridays".to_string(),
        description: Some("Whole team in the office on Fridays".to_string()),
        team_id: Some(Uuid::new_v4()),
        department_id: None,
        affected_user_ids: affected,
        exemptions: vec![],
        required_mode: TeleworkMode::OnSite,
        recurrence: Json(Recurrence::Weekly {
            weekly_pattern: WeeklyRecurrence { day_of_week: 5 },
        }),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// Week of 2025-06-02: Monday and Tuesday already approved remote, a third
// remote day must trip the weekly quota.
#[test]
fn third_remote_day_in_a_full_week_is_invalid_but_submittable() {
    let user_id = Uuid::new_v4();
    let week = vec![
        approved_remote(user_id, date(2025, 6, 2)),
        approved_remote(user_id, date(2025, 6, 3)),
    ];

    let result = evaluate_request(
        &profile(user_id),
        &week,
        &[],
        date(2025, 6, 4),
        TeleworkMode::Remote,
    );

    assert!(!result.is_valid);
    assert!(result.can_proceed, "quota errors do not block submission");
    assert!(result.requires_approval);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(
        result.conflicts[0].conflict_type,
        ConflictType::ConstraintViolation
    );
    assert_eq!(result.conflicts[0].severity, ConflictSeverity::Error);
    assert_eq!(result.conflicts[0].source, WEEKLY_LIMIT_SOURCE);
}

// Re-requesting the already-approved Monday leaves only Tuesday in the
// count, so the request does not block itself.
#[test]
fn re_requesting_an_approved_day_passes_the_quota() {
    let user_id = Uuid::new_v4();
    let week = vec![
        approved_remote(user_id, date(2025, 6, 2)),
        approved_remote(user_id, date(2025, 6, 3)),
    ];

    let result = evaluate_request(
        &profile(user_id),
        &week,
        &[],
        date(2025, 6, 2),
        TeleworkMode::Remote,
    );

    assert!(result.is_valid);
    assert!(result.conflicts.is_empty());
}

#[test]
fn friday_remote_request_against_on_site_rule_warns_only() {
    let user_id = Uuid::new_v4();
    let rule = friday_on_site_rule(vec![user_id, Uuid::new_v4()]);

    // 2025-06-06 is a Friday
    let result = evaluate_request(
        &profile(user_id),
        &[],
        &[rule.clone()],
        date(2025, 6, 6),
        TeleworkMode::Remote,
    );

    assert!(result.is_valid, "warnings never invalidate");
    assert!(result.requires_approval);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(
        result.conflicts[0].conflict_type,
        ConflictType::TeamRuleConflict
    );
    assert_eq!(result.conflicts[0].severity, ConflictSeverity::Warning);
    assert_eq!(result.conflicts[0].source, rule.id.to_string());
}

#[test]
fn weeks_are_monday_to_sunday() {
    let (start, end) = week_bounds(date(2025, 6, 4));
    assert_eq!(start, date(2025, 6, 2));
    assert_eq!(end, date(2025, 6, 8));

    // Saturday and Sunday of the same week share the bounds
    assert_eq!(week_bounds(date(2025, 6, 7)), (start, end));
    assert_eq!(week_bounds(date(2025, 6, 8)), (start, end));
}

#[test]
fn overrides_from_an_adjacent_week_never_count() {
    let user_id = Uuid::new_v4();
    // Friday + Saturday of the previous week
    let previous_week = vec![
        approved_remote(user_id, date(2025, 5, 30)),
        approved_remote(user_id, date(2025, 5, 31)),
    ];

    let result = evaluate_request(
        &profile(user_id),
        &previous_week,
        &[],
        date(2025, 6, 2),
        TeleworkMode::Remote,
    );

    assert!(result.is_valid);
    assert!(result.conflicts.is_empty());
}

#[test]
fn specific_date_rules_fire_on_calendar_equality() {
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let rule = TeamTeleworkRule {
        id: Uuid::new_v4(),
        name: "Inventory day".to_string(),
        description: None,
        team_id: None,
        department_id: Some(Uuid::new_v4()),
        affected_user_ids: vec![user_id],
        exemptions: vec![],
        required_mode: TeleworkMode::OnSite,
        recurrence: Json(Recurrence::SpecificDates {
            specific_dates: vec![date(2025, 6, 30), date(2025, 12, 31)],
        }),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    assert!(rule_applies_on(&rule, date(2025, 6, 30)));
    assert!(!rule_applies_on(&rule, date(2025, 6, 29)));
}

#[test]
fn validation_result_serializes_for_the_admin_ui() {
    let user_id = Uuid::new_v4();
    let week = vec![
        approved_remote(user_id, date(2025, 6, 2)),
        approved_remote(user_id, date(2025, 6, 3)),
    ];

    let result = evaluate_request(
        &profile(user_id),
        &week,
        &[],
        date(2025, 6, 4),
        TeleworkMode::Remote,
    );
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["isValid"], false);
    assert_eq!(json["canProceed"], true);
    assert_eq!(json["requiresApproval"], true);
    assert_eq!(json["conflicts"][0]["type"], "constraint_violation");
    assert_eq!(json["conflicts"][0]["severity"], "error");
    assert_eq!(json["conflicts"][0]["source"], "weekly_limit");
    // No reason field on a computed result
    assert!(json.get("reason").is_none());
}

#[test]
fn blocked_results_carry_the_reason() {
    let result = ValidationResult::blocked("profile not found");

    assert!(!result.is_valid);
    assert!(!result.can_proceed);
    assert_eq!(result.reason.as_deref(), Some("profile not found"));
    assert!(result.conflicts.is_empty());
    assert!(!result.requires_approval);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["reason"], "profile not found");
}
