use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::core::{
    BusinessRuleViolation, Invoice, RiskLevel, RuleConfig, Severity, ViolationType,
};
use crate::matching::ValidationResult;

use super::reasoning::{ReasoningGenerator, fallback_reasoning, reasoning_prompt};
use super::types::{ActionType, ProcessingRecommendation};

/// Synthesizes the final processing recommendation from PO validation and
/// business rule results.
pub struct RecommendationEngine {
    config: RuleConfig,
    reasoning: Option<Box<dyn ReasoningGenerator + Send + Sync>>,
}

impl RecommendationEngine {
    /// Engine without a reasoning collaborator; reasoning text comes from
    /// the deterministic templates.
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config,
            reasoning: None,
        }
    }

    /// Attach a reasoning collaborator. Its failures degrade to the
    /// deterministic templates.
    pub fn with_reasoning(
        mut self,
        generator: impl ReasoningGenerator + Send + Sync + 'static,
    ) -> Self {
        self.reasoning = Some(Box::new(generator));
        self
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Produce the final recommendation for an invoice.
    ///
    /// Decisions are taken over the union of the validation result's
    /// violations and the business rule violations. Pure with respect to its
    /// inputs: identical inputs yield identical action, risk level, and
    /// confidence (reasoning text may vary only through a non-deterministic
    /// collaborator).
    pub fn generate_recommendation(
        &self,
        invoice: &Invoice,
        validation_result: &ValidationResult,
        business_rule_violations: &[BusinessRuleViolation],
    ) -> ProcessingRecommendation {
        info!(invoice = %invoice.invoice_number, "generating recommendation");
        let started = Instant::now();

        let all_violations: Vec<BusinessRuleViolation> = validation_result
            .violations
            .iter()
            .chain(business_rule_violations)
            .cloned()
            .collect();

        let action = self.base_action(invoice, validation_result, &all_violations);
        let reasoning = self.reasoning_text(invoice, validation_result, &all_violations, action);
        let confidence_score = recommendation_confidence(validation_result, &all_violations);
        let risk_level = RiskLevel::from_violations(&all_violations);

        let auto_approvable = self.is_auto_approvable(invoice, &all_violations);
        let requires_manual_review = self.requires_manual_review(invoice, &all_violations);
        let approval_threshold_exceeded =
            invoice.total_amount > self.config.auto_approve_threshold;

        let flagged_issues = flagged_issues(&all_violations);
        let suggested_actions =
            self.suggested_actions(invoice, validation_result, &all_violations);
        let next_steps = next_steps(action);

        info!(invoice = %invoice.invoice_number, action = %action, "recommendation generated");

        ProcessingRecommendation {
            action,
            confidence_score,
            reasoning,
            flagged_issues,
            risk_level,
            validation_result: validation_result.clone(),
            auto_approvable,
            requires_manual_review,
            approval_threshold_exceeded,
            suggested_actions,
            next_steps,
            recommended_at: Utc::now(),
            processing_time_ms: Some(started.elapsed().as_millis() as u64),
        }
    }

    /// Ordered decision table over the merged violation list.
    fn base_action(
        &self,
        invoice: &Invoice,
        validation: &ValidationResult,
        violations: &[BusinessRuleViolation],
    ) -> ActionType {
        if has_severity(violations, Severity::Critical) {
            return ActionType::Reject;
        }

        if has_severity(violations, Severity::High) {
            return ActionType::ManualReview;
        }

        if validation.po_found && validation.is_valid {
            return if invoice.total_amount <= self.config.auto_approve_threshold {
                ActionType::Approve
            } else {
                ActionType::ManualReview
            };
        }

        if !validation.po_found {
            return ActionType::Hold;
        }

        if has_severity(violations, Severity::Medium) {
            return ActionType::ManualReview;
        }

        // Default to manual review for safety
        ActionType::ManualReview
    }

    fn reasoning_text(
        &self,
        invoice: &Invoice,
        validation: &ValidationResult,
        violations: &[BusinessRuleViolation],
        action: ActionType,
    ) -> String {
        if let Some(generator) = &self.reasoning {
            let prompt = reasoning_prompt(invoice, validation, violations, action);
            match generator.generate(&prompt) {
                Ok(text) => return text.trim().to_string(),
                Err(err) => warn!(error = %err, "reasoning generation failed, using fallback"),
            }
        }
        fallback_reasoning(invoice, validation, violations, action)
    }

    fn is_auto_approvable(
        &self,
        invoice: &Invoice,
        violations: &[BusinessRuleViolation],
    ) -> bool {
        if violations.iter().any(|v| v.severity >= Severity::High) {
            return false;
        }
        invoice.total_amount <= self.config.auto_approve_threshold
    }

    fn requires_manual_review(
        &self,
        invoice: &Invoice,
        violations: &[BusinessRuleViolation],
    ) -> bool {
        violations.iter().any(|v| v.severity >= Severity::High)
            || invoice.total_amount > self.config.require_manual_review_threshold
    }

    fn suggested_actions(
        &self,
        invoice: &Invoice,
        validation: &ValidationResult,
        violations: &[BusinessRuleViolation],
    ) -> Vec<String> {
        let mut actions = Vec::new();

        if !validation.po_found {
            actions.push("Create purchase order for this vendor".to_string());
            actions.push("Verify vendor is authorized".to_string());
        }

        if !violations.is_empty() {
            actions.push("Review and resolve identified violations".to_string());
            actions.push("Contact vendor for clarification if needed".to_string());
        }

        if invoice.total_amount > self.config.require_manual_review_threshold {
            actions.push("Obtain additional approval for high-value invoice".to_string());
        }

        if violations
            .iter()
            .any(|v| v.violation_type == ViolationType::InvalidTaxCalculation)
        {
            actions.push("Verify tax calculations with accounting team".to_string());
        }

        actions
    }
}

fn has_severity(violations: &[BusinessRuleViolation], severity: Severity) -> bool {
    violations.iter().any(|v| v.severity == severity)
}

/// Recommendation confidence: validation confidence, reduced by violation
/// count (capped at 0.4) and severity-weighted penalties, floored at 0.1.
fn recommendation_confidence(
    validation: &ValidationResult,
    violations: &[BusinessRuleViolation],
) -> f64 {
    let count = |severity: Severity| {
        violations
            .iter()
            .filter(|v| v.severity == severity)
            .count() as f64
    };

    let violation_penalty = (violations.len() as f64 * 0.1).min(0.4);
    let critical_penalty = count(Severity::Critical) * 0.2;
    let high_penalty = count(Severity::High) * 0.15;
    let medium_penalty = count(Severity::Medium) * 0.1;

    let total_penalty = violation_penalty + critical_penalty + high_penalty + medium_penalty;
    (validation.confidence_score - total_penalty).max(0.1)
}

/// Formatted entries for every HIGH/CRITICAL violation.
fn flagged_issues(violations: &[BusinessRuleViolation]) -> Vec<String> {
    violations
        .iter()
        .filter(|v| v.severity >= Severity::High)
        .map(|v| format!("{}: {}", v.severity, v.description))
        .collect()
}

/// Fixed follow-up checklist for the chosen action.
fn next_steps(action: ActionType) -> Vec<String> {
    let steps: &[&str] = match action {
        ActionType::Approve => &[
            "Process payment according to payment terms",
            "Update invoice status in system",
        ],
        ActionType::Reject => &[
            "Notify vendor of rejection",
            "Document rejection reasons",
            "Return invoice to vendor for correction",
        ],
        ActionType::ManualReview => &[
            "Assign to appropriate reviewer",
            "Gather additional documentation if needed",
            "Schedule review meeting if required",
        ],
        ActionType::Hold => &[
            "Investigate missing purchase order",
            "Contact vendor for PO reference",
            "Create PO if vendor is authorized",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}
