use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    ApprovalStatus, Conflict, ConflictSeverity, ConflictType, CreateProfileInput,
    OverrideQuery, OverrideRequestInput, Recurrence, TeamTeleworkRule, TeleworkMode,
    TeleworkOverride, UpdateProfileInput, UserRole, UserTeleworkProfile, ValidationResult,
    WEEKLY_LIMIT_SOURCE, generate_override_id,
};
use crate::database::repositories::{
    OverrideRepository, TeamRuleRepository, TeleworkProfileRepository, UserRepository,
};
use crate::error::AppError;
use crate::services::auth::Claims;

/// Caller identity forwarded to mutating operations. `None` means a trusted
/// internal call; ownership checks are skipped for those.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Actor {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Clone)]
pub struct TeleworkService {
    users: UserRepository,
    profiles: TeleworkProfileRepository,
    overrides: OverrideRepository,
    rules: TeamRuleRepository,
}

impl TeleworkService {
    pub fn new(
        users: UserRepository,
        profiles: TeleworkProfileRepository,
        overrides: OverrideRepository,
        rules: TeamRuleRepository,
    ) -> Self {
        Self {
            users,
            profiles,
            overrides,
            rules,
        }
    }

    // Validation

    /// Dry-run check of an override request. Never fails: lookup errors
    /// degrade to a negative result so callers can render the outcome
    /// without handling exceptions.
    pub async fn validate_override_request(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        requested_mode: TeleworkMode,
    ) -> ValidationResult {
        match self.run_validation(user_id, date, requested_mode).await {
            Ok(result) => result,
            Err(err) => {
                log::error!(
                    "Override validation failed for user {} on {}: {}",
                    user_id,
                    date,
                    err
                );
                ValidationResult::blocked("validation error")
            }
        }
    }

    async fn run_validation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        requested_mode: TeleworkMode,
    ) -> Result<ValidationResult> {
        let Some(profile) = self.profiles.find_by_user(user_id).await? else {
            return Ok(ValidationResult::blocked("profile not found"));
        };

        let (week_start, week_end) = week_bounds(date);
        let week_overrides = self
            .overrides
            .list(Some(user_id), None, Some(week_start), Some(week_end))
            .await?;
        let rules = self.rules.find_active_for_user(user_id).await?;

        Ok(evaluate_request(
            &profile,
            &week_overrides,
            &rules,
            date,
            requested_mode,
        ))
    }

    // Override lifecycle

    pub async fn request_override(
        &self,
        input: OverrideRequestInput,
        actor: Option<Actor>,
    ) -> Result<TeleworkOverride, AppError> {
        if let Some(actor) = actor {
            if actor.user_id != input.user_id && !actor.role.can_manage_telework() {
                return Err(AppError::PermissionDenied(
                    "Telework overrides can only be declared for yourself".to_string(),
                ));
            }
        }

        let validation = self
            .validate_override_request(input.user_id, input.date, input.mode)
            .await;
        if !validation.can_proceed {
            return Err(AppError::BadRequest(
                validation
                    .reason
                    .unwrap_or_else(|| "validation error".to_string()),
            ));
        }

        let id = generate_override_id(input.user_id, input.date);
        let status = if validation.requires_approval {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::Approved
        };
        let actor_id = actor.map(|a| a.user_id);
        // A request that needs no approval is self-approved at creation time.
        let (approved_by, approved_at) = if status == ApprovalStatus::Approved {
            (Some(actor_id.unwrap_or(input.user_id)), Some(Utc::now()))
        } else {
            (None, None)
        };

        let override_row = self
            .overrides
            .upsert(&id, &input, status, approved_by, approved_at, actor_id)
            .await?;

        Ok(override_row)
    }

    pub async fn approve_override(
        &self,
        id: &str,
        approver: Uuid,
    ) -> Result<TeleworkOverride, AppError> {
        let existing = self.require_override(id).await?;
        ensure_pending(&existing)?;

        Ok(self
            .overrides
            .set_decision(id, ApprovalStatus::Approved, approver, None)
            .await?)
    }

    pub async fn reject_override(
        &self,
        id: &str,
        approver: Uuid,
        rejection_reason: Option<String>,
    ) -> Result<TeleworkOverride, AppError> {
        let existing = self.require_override(id).await?;
        ensure_pending(&existing)?;
        let reason = normalize_rejection_reason(rejection_reason)?;

        Ok(self
            .overrides
            .set_decision(id, ApprovalStatus::Rejected, approver, Some(&reason))
            .await?)
    }

    pub async fn delete_override(&self, id: &str, actor: Option<Actor>) -> Result<(), AppError> {
        let existing = self.require_override(id).await?;

        if let Some(actor) = actor {
            if actor.user_id != existing.user_id && !actor.role.can_manage_telework() {
                return Err(AppError::PermissionDenied(
                    "Only the owner or a manager can delete a telework override".to_string(),
                ));
            }
        }

        self.overrides.delete(id).await?;
        Ok(())
    }

    pub async fn cleanup_expired_overrides(&self) -> Result<u64, AppError> {
        Ok(self.overrides.delete_expired(Utc::now()).await?)
    }

    pub async fn get_overrides(
        &self,
        query: &OverrideQuery,
    ) -> Result<Vec<TeleworkOverride>, AppError> {
        Ok(self
            .overrides
            .list(query.user_id, query.status, query.start_date, query.end_date)
            .await?)
    }

    pub async fn get_user_overrides(
        &self,
        user_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<TeleworkOverride>, AppError> {
        Ok(self
            .overrides
            .list(Some(user_id), None, start_date, end_date)
            .await?)
    }

    /// Overrides awaiting a decision. The approver filter is accepted for
    /// API compatibility but not applied: overrides carry no assigned
    /// approver to match against.
    pub async fn get_pending_overrides(
        &self,
        _approver_id: Option<Uuid>,
    ) -> Result<Vec<TeleworkOverride>, AppError> {
        Ok(self
            .overrides
            .list(None, Some(ApprovalStatus::Pending), None, None)
            .await?)
    }

    // Profiles

    pub async fn create_profile(
        &self,
        input: CreateProfileInput,
        actor: Option<Actor>,
    ) -> Result<UserTeleworkProfile, AppError> {
        if let Some(actor) = actor {
            if actor.user_id != input.user_id && !actor.role.can_manage_telework() {
                return Err(AppError::PermissionDenied(
                    "Telework profiles can only be created for yourself".to_string(),
                ));
            }
        }

        let user = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", input.user_id)))?;

        if self.profiles.find_by_user(input.user_id).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "User {} already has a telework profile",
                input.user_id
            )));
        }

        let display_name = input.display_name.unwrap_or(user.name);

        Ok(self
            .profiles
            .create(
                input.user_id,
                &display_name,
                input.default_mode.unwrap_or(TeleworkMode::OnSite),
                &input.weekly_pattern.unwrap_or_default(),
                &input.constraints.unwrap_or_default(),
                actor.map(|a| a.user_id),
            )
            .await?)
    }

    pub async fn get_or_create_profile(
        &self,
        user_id: Uuid,
        actor: Option<Actor>,
    ) -> Result<UserTeleworkProfile, AppError> {
        if let Some(profile) = self.profiles.find_by_user(user_id).await? {
            return Ok(profile);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(self
            .profiles
            .get_or_create(user_id, &user.name, actor.map(|a| a.user_id))
            .await?)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
        actor: Option<Actor>,
    ) -> Result<UserTeleworkProfile, AppError> {
        if let Some(actor) = actor {
            if actor.user_id != user_id && !actor.role.can_manage_telework() {
                return Err(AppError::PermissionDenied(
                    "Telework profiles can only be updated for yourself".to_string(),
                ));
            }
        }

        self.profiles
            .update(user_id, &input, actor.map(|a| a.user_id))
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Telework profile for user {} not found", user_id))
            })
    }

    async fn require_override(&self, id: &str) -> Result<TeleworkOverride, AppError> {
        self.overrides
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Telework override {} not found", id)))
    }
}

/// Approval decisions are one-way: once approved or rejected, the only way
/// back is delete + recreate.
fn ensure_pending(existing: &TeleworkOverride) -> Result<(), AppError> {
    if existing.approval_status != ApprovalStatus::Pending {
        return Err(AppError::BadRequest(format!(
            "Override {} was already processed (status: {})",
            existing.id, existing.approval_status
        )));
    }
    Ok(())
}

fn normalize_rejection_reason(reason: Option<String>) -> Result<String, AppError> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("A rejection reason is required".to_string()))
}

/// Monday-start week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Whether a rule constrains the given calendar day. Unknown recurrence
/// kinds are never active.
pub fn rule_applies_on(rule: &TeamTeleworkRule, date: NaiveDate) -> bool {
    match &*rule.recurrence {
        Recurrence::Weekly { weekly_pattern } => {
            u32::from(weekly_pattern.day_of_week) == date.weekday().number_from_monday()
        }
        Recurrence::SpecificDates { specific_dates } => specific_dates.contains(&date),
        Recurrence::Unknown => false,
    }
}

/// Decides a single override request from already-loaded state.
///
/// The weekly count skips `date` itself so re-validating an existing day
/// never blocks on its own row, and only approved remote days consume the
/// quota. Team-rule mismatches warn and force approval; they never make the
/// request invalid on their own.
pub fn evaluate_request(
    profile: &UserTeleworkProfile,
    week_overrides: &[TeleworkOverride],
    rules: &[TeamTeleworkRule],
    date: NaiveDate,
    requested_mode: TeleworkMode,
) -> ValidationResult {
    let mut conflicts = Vec::new();

    if requested_mode == TeleworkMode::Remote {
        let (week_start, week_end) = week_bounds(date);
        let max_remote = profile.constraints.max_remote_days_per_week();
        let approved_remote = week_overrides
            .iter()
            .filter(|o| o.date >= week_start && o.date <= week_end && o.date != date)
            .filter(|o| {
                o.mode == TeleworkMode::Remote && o.approval_status == ApprovalStatus::Approved
            })
            .count() as i32;

        if approved_remote >= max_remote {
            conflicts.push(Conflict {
                conflict_type: ConflictType::ConstraintViolation,
                severity: ConflictSeverity::Error,
                message: format!(
                    "{} of {} remote days already approved for the week of {}",
                    approved_remote, max_remote, week_start
                ),
                source: WEEKLY_LIMIT_SOURCE.to_string(),
                resolution_suggestions: vec![
                    "Choose a day in another week".to_string(),
                    "Ask a manager to adjust the weekly remote limit".to_string(),
                ],
            });
        }
    }

    for rule in rules {
        if !rule.is_active || !rule.affects(profile.user_id) || rule.exempts(profile.user_id) {
            continue;
        }
        if !rule_applies_on(rule, date) || rule.required_mode == requested_mode {
            continue;
        }

        conflicts.push(Conflict {
            conflict_type: ConflictType::TeamRuleConflict,
            severity: ConflictSeverity::Warning,
            message: format!(
                "Team rule '{}' expects {} on {}",
                rule.name, rule.required_mode, date
            ),
            source: rule.id.to_string(),
            resolution_suggestions: vec![
                format!("Switch the request to {}", rule.required_mode),
                "Ask for an exemption from the rule".to_string(),
            ],
        });
    }

    let has_errors = conflicts
        .iter()
        .any(|c| c.severity == ConflictSeverity::Error);
    let has_rule_conflicts = conflicts
        .iter()
        .any(|c| c.conflict_type == ConflictType::TeamRuleConflict);
    let requires_approval =
        profile.constraints.requires_approval() || has_rule_conflicts || has_errors;

    ValidationResult {
        is_valid: !has_errors,
        can_proceed: true,
        reason: None,
        conflicts,
        requires_approval,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use sqlx::types::Json;

    use super::*;
    use crate::database::models::{TeleworkConstraints, WeeklyPattern, WeeklyRecurrence};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile_with(user_id: Uuid, constraints: TeleworkConstraints) -> UserTeleworkProfile {
        let now = Utc::now();
        UserTeleworkProfile {
            user_id,
            display_name: "Jean Dupont".to_string(),
            default_mode: TeleworkMode::OnSite,
            weekly_pattern: Json(WeeklyPattern::default()),
            constraints: Json(constraints),
            is_active: true,
            created_by: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn override_on(
        user_id: Uuid,
        day: NaiveDate,
        mode: TeleworkMode,
        status: ApprovalStatus,
    ) -> TeleworkOverride {
        let now = Utc::now();
        TeleworkOverride {
            id: generate_override_id(user_id, day),
            user_id,
            date: day,
            mode,
            reason: None,
            approval_status: status,
            approved_by: (status == ApprovalStatus::Approved).then_some(user_id),
            approved_at: (status == ApprovalStatus::Approved).then_some(now),
            rejection_reason: None,
            expires_at: None,
            created_by: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn approved_remote(user_id: Uuid, day: NaiveDate) -> TeleworkOverride {
        override_on(user_id, day, TeleworkMode::Remote, ApprovalStatus::Approved)
    }

    fn rule_with(
        affected: Vec<Uuid>,
        exemptions: Vec<Uuid>,
        required_mode: TeleworkMode,
        recurrence: Recurrence,
    ) -> TeamTeleworkRule {
        let now = Utc::now();
        TeamTeleworkRule {
            id: Uuid::new_v4(),
            name: "Core day".to_string(),
            description: None,
            team_id: Some(Uuid::new_v4()),
            department_id: None,
            affected_user_ids: affected,
            exemptions,
            required_mode,
            recurrence: Json(recurrence),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn friday_on_site(affected: Vec<Uuid>, exemptions: Vec<Uuid>) -> TeamTeleworkRule {
        rule_with(
            affected,
            exemptions,
            TeleworkMode::OnSite,
            Recurrence::Weekly {
                weekly_pattern: WeeklyRecurrence { day_of_week: 5 },
            },
        )
    }

    #[test]
    fn week_bounds_run_monday_through_sunday() {
        // 2025-06-04 is a Wednesday
        assert_eq!(
            week_bounds(date(2025, 6, 4)),
            (date(2025, 6, 2), date(2025, 6, 8))
        );
        // A Monday maps to its own week
        assert_eq!(
            week_bounds(date(2025, 6, 2)),
            (date(2025, 6, 2), date(2025, 6, 8))
        );
        // A Sunday still belongs to the week started the previous Monday
        assert_eq!(
            week_bounds(date(2025, 6, 8)),
            (date(2025, 6, 2), date(2025, 6, 8))
        );
    }

    #[test]
    fn remote_request_over_weekly_limit_raises_error_conflict() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let week = vec![
            approved_remote(user_id, date(2025, 6, 2)),
            approved_remote(user_id, date(2025, 6, 3)),
        ];

        let result = evaluate_request(&profile, &week, &[], date(2025, 6, 4), TeleworkMode::Remote);

        assert!(!result.is_valid);
        assert!(result.can_proceed);
        assert!(result.requires_approval);
        assert_eq!(result.conflicts.len(), 1);
        let conflict = &result.conflicts[0];
        assert_eq!(conflict.conflict_type, ConflictType::ConstraintViolation);
        assert_eq!(conflict.severity, ConflictSeverity::Error);
        assert_eq!(conflict.source, WEEKLY_LIMIT_SOURCE);
    }

    #[test]
    fn revalidating_an_approved_day_excludes_it_from_the_count() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let week = vec![
            approved_remote(user_id, date(2025, 6, 2)),
            approved_remote(user_id, date(2025, 6, 3)),
        ];

        // Re-requesting Monday only counts Tuesday against the quota.
        let result = evaluate_request(&profile, &week, &[], date(2025, 6, 2), TeleworkMode::Remote);

        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
        assert!(!result.requires_approval);
    }

    #[test]
    fn pending_and_rejected_days_do_not_consume_the_quota() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let week = vec![
            override_on(
                user_id,
                date(2025, 6, 2),
                TeleworkMode::Remote,
                ApprovalStatus::Pending,
            ),
            override_on(
                user_id,
                date(2025, 6, 3),
                TeleworkMode::Remote,
                ApprovalStatus::Rejected,
            ),
            approved_remote(user_id, date(2025, 6, 5)),
        ];

        let result = evaluate_request(&profile, &week, &[], date(2025, 6, 4), TeleworkMode::Remote);

        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn approved_on_site_days_do_not_consume_the_quota() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let week = vec![
            override_on(
                user_id,
                date(2025, 6, 2),
                TeleworkMode::OnSite,
                ApprovalStatus::Approved,
            ),
            approved_remote(user_id, date(2025, 6, 3)),
        ];

        let result = evaluate_request(&profile, &week, &[], date(2025, 6, 4), TeleworkMode::Remote);

        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn on_site_request_skips_the_weekly_quota() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let week = vec![
            approved_remote(user_id, date(2025, 6, 2)),
            approved_remote(user_id, date(2025, 6, 3)),
        ];

        let result = evaluate_request(&profile, &week, &[], date(2025, 6, 4), TeleworkMode::OnSite);

        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
        assert!(!result.requires_approval);
    }

    #[test]
    fn raised_limit_admits_more_remote_days() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(
            user_id,
            TeleworkConstraints {
                max_remote_days_per_week: Some(3),
                ..Default::default()
            },
        );
        let week = vec![
            approved_remote(user_id, date(2025, 6, 2)),
            approved_remote(user_id, date(2025, 6, 3)),
        ];

        let result = evaluate_request(&profile, &week, &[], date(2025, 6, 4), TeleworkMode::Remote);

        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn team_rule_mismatch_warns_and_forces_approval() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let rule = friday_on_site(vec![user_id], vec![]);

        // 2025-06-06 is a Friday
        let result = evaluate_request(
            &profile,
            &[],
            &[rule.clone()],
            date(2025, 6, 6),
            TeleworkMode::Remote,
        );

        assert!(result.is_valid, "team rules never invalidate on their own");
        assert!(result.requires_approval);
        assert_eq!(result.conflicts.len(), 1);
        let conflict = &result.conflicts[0];
        assert_eq!(conflict.conflict_type, ConflictType::TeamRuleConflict);
        assert_eq!(conflict.severity, ConflictSeverity::Warning);
        assert_eq!(conflict.source, rule.id.to_string());
    }

    #[test]
    fn exempted_user_ignores_team_rule() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let rule = friday_on_site(vec![user_id], vec![user_id]);

        let result =
            evaluate_request(&profile, &[], &[rule], date(2025, 6, 6), TeleworkMode::Remote);

        assert!(result.conflicts.is_empty());
        assert!(!result.requires_approval);
    }

    #[test]
    fn rule_for_other_users_or_other_days_is_ignored() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let other_team = friday_on_site(vec![Uuid::new_v4()], vec![]);
        let friday_rule = friday_on_site(vec![user_id], vec![]);

        let unrelated = evaluate_request(
            &profile,
            &[],
            &[other_team],
            date(2025, 6, 6),
            TeleworkMode::Remote,
        );
        assert!(unrelated.conflicts.is_empty());

        // Thursday request against a Friday rule
        let other_day = evaluate_request(
            &profile,
            &[],
            &[friday_rule],
            date(2025, 6, 5),
            TeleworkMode::Remote,
        );
        assert!(other_day.conflicts.is_empty());
    }

    #[test]
    fn inactive_rule_is_ignored() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let mut rule = friday_on_site(vec![user_id], vec![]);
        rule.is_active = false;

        let result =
            evaluate_request(&profile, &[], &[rule], date(2025, 6, 6), TeleworkMode::Remote);

        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn matching_required_mode_produces_no_conflict() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let rule = friday_on_site(vec![user_id], vec![]);

        let result =
            evaluate_request(&profile, &[], &[rule], date(2025, 6, 6), TeleworkMode::OnSite);

        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn specific_dates_rule_matches_by_calendar_day() {
        let user_id = Uuid::new_v4();
        let rule = rule_with(
            vec![user_id],
            vec![],
            TeleworkMode::OnSite,
            Recurrence::SpecificDates {
                specific_dates: vec![date(2025, 12, 24)],
            },
        );

        assert!(rule_applies_on(&rule, date(2025, 12, 24)));
        assert!(!rule_applies_on(&rule, date(2025, 12, 25)));
    }

    #[test]
    fn unknown_recurrence_kind_is_never_active() {
        let user_id = Uuid::new_v4();
        let mut rule = friday_on_site(vec![user_id], vec![]);
        rule.recurrence = Json(
            serde_json::from_value(serde_json::json!({"type": "monthly", "dayOfMonth": 1}))
                .unwrap(),
        );

        assert!(!rule_applies_on(&rule, date(2025, 6, 6)));
    }

    #[test]
    fn profile_approval_flag_forces_approval_without_conflicts() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(
            user_id,
            TeleworkConstraints {
                requires_approval: Some(true),
                ..Default::default()
            },
        );

        let result = evaluate_request(&profile, &[], &[], date(2025, 6, 4), TeleworkMode::Remote);

        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
        assert!(result.requires_approval);
    }

    #[test]
    fn quota_and_team_rule_conflicts_accumulate() {
        let user_id = Uuid::new_v4();
        let profile = profile_with(user_id, TeleworkConstraints::default());
        let week = vec![
            approved_remote(user_id, date(2025, 6, 2)),
            approved_remote(user_id, date(2025, 6, 3)),
        ];
        let rule = friday_on_site(vec![user_id], vec![]);

        let result = evaluate_request(
            &profile,
            &week,
            &[rule],
            date(2025, 6, 6),
            TeleworkMode::Remote,
        );

        assert!(!result.is_valid);
        assert!(result.requires_approval);
        assert_eq!(result.conflicts.len(), 2);
    }

    #[test]
    fn decisions_require_a_pending_override() {
        let user_id = Uuid::new_v4();
        let processed = override_on(
            user_id,
            date(2025, 6, 2),
            TeleworkMode::Remote,
            ApprovalStatus::Approved,
        );
        let pending = override_on(
            user_id,
            date(2025, 6, 3),
            TeleworkMode::Remote,
            ApprovalStatus::Pending,
        );

        let err = ensure_pending(&processed).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("approved")));
        assert!(ensure_pending(&pending).is_ok());
    }

    #[test]
    fn rejection_reason_must_be_non_blank() {
        assert!(normalize_rejection_reason(None).is_err());
        assert!(normalize_rejection_reason(Some("   ".to_string())).is_err());
        assert_eq!(
            normalize_rejection_reason(Some("  too many absences  ".to_string())).unwrap(),
            "too many absences"
        );
    }
}
