use serde::{Deserialize, Serialize};

/// Conflict source for weekly remote-day quota violations; team-rule
/// conflicts use the rule id as their source instead.
pub const WEEKLY_LIMIT_SOURCE: &str = "weekly_limit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    ConstraintViolation,
    TeamRuleConflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub severity: ConflictSeverity,
    pub message: String,
    pub source: String,
    pub resolution_suggestions: Vec<String>,
}

/// Outcome of a dry-run validation. Validity and proceed-ability are
/// distinct: an invalid request can still be submitted (it lands in
/// pending), while `can_proceed: false` means it cannot be submitted at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub can_proceed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub conflicts: Vec<Conflict>,
    pub requires_approval: bool,
}

impl ValidationResult {
    /// Terminal failure: the request cannot even be submitted.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            can_proceed: false,
            reason: Some(reason.into()),
            conflicts: Vec::new(),
            requires_approval: false,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.severity == ConflictSeverity::Error)
    }
}
