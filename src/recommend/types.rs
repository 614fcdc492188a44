use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::RiskLevel;
use crate::matching::ValidationResult;

/// Terminal processing action for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Approve,
    Reject,
    Hold,
    ManualReview,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::Hold => "HOLD",
            Self::ManualReview => "MANUAL_REVIEW",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final processing recommendation for an invoice, persisted alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingRecommendation {
    /// Recommended action.
    pub action: ActionType,
    /// Confidence in the recommendation, in `[0.1, 1]`.
    pub confidence_score: f64,
    /// Narrative justification; always present, falling back to a
    /// deterministic template when no reasoning collaborator is available.
    pub reasoning: String,

    /// Formatted HIGH/CRITICAL issues.
    pub flagged_issues: Vec<String>,
    pub risk_level: RiskLevel,

    /// The PO validation this recommendation was derived from.
    pub validation_result: ValidationResult,

    pub auto_approvable: bool,
    pub requires_manual_review: bool,
    /// Amount above the auto-approve threshold.
    pub approval_threshold_exceeded: bool,

    /// Suggested follow-up actions.
    pub suggested_actions: Vec<String>,
    /// Recommended next steps for the chosen action.
    pub next_steps: Vec<String>,

    pub recommended_at: DateTime<Utc>,
    pub processing_time_ms: Option<u64>,
}

impl ProcessingRecommendation {
    pub fn is_high_risk(&self) -> bool {
        matches!(self.risk_level, RiskLevel::High | RiskLevel::Critical)
    }

    /// Whether the recommendation needs human escalation.
    pub fn requires_escalation(&self) -> bool {
        self.action == ActionType::Reject
            || self.action == ActionType::ManualReview
            || self.is_high_risk()
            || self.validation_result.has_critical_violations()
    }

    /// Brief one-line summary: action plus truncated reasoning.
    pub fn summary(&self) -> String {
        let head: String = self.reasoning.chars().take(100).collect();
        format!("{} - {}...", self.action, head)
    }
}
