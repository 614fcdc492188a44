use crate::core::{BusinessRuleViolation, Invoice, ReconcileError, Severity};
use crate::matching::ValidationResult;

use super::types::ActionType;

/// Narrative reasoning seam.
///
/// Implementations typically call an LLM. The engine tolerates failure:
/// any error falls back to the deterministic action-keyed templates, so the
/// pipeline always produces reasoning text.
pub trait ReasoningGenerator {
    fn generate(&self, prompt: &str) -> Result<String, ReconcileError>;
}

/// Build the structured prompt handed to the reasoning collaborator.
pub(crate) fn reasoning_prompt(
    invoice: &Invoice,
    validation: &ValidationResult,
    violations: &[BusinessRuleViolation],
    action: ActionType,
) -> String {
    let po_status = if validation.po_found {
        "found"
    } else {
        "not found"
    };
    let po_number = validation.po_number.as_deref().unwrap_or("N/A");

    let violations_text = if violations.is_empty() {
        "None".to_string()
    } else {
        violations
            .iter()
            .map(|v| format!("- {}: {}", v.severity, v.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "\
Based on the following invoice processing results, provide a clear and professional reasoning for the recommended action.

INVOICE DETAILS:
- Invoice Number: {invoice_number}
- Vendor: {vendor}
- Amount: ${amount}
- Date: {date}

VALIDATION RESULTS:
- Purchase Order: {po_status} ({po_number})
- Line Item Match: {match_pct:.1}%
- Overall Valid: {is_valid}
- Confidence Score: {confidence:.2}

VIOLATIONS FOUND:
{violations_text}

RECOMMENDED ACTION: {action}

Please provide a 2-3 sentence explanation that:
1. Summarizes the key findings
2. Explains why this action was recommended
3. Mentions any specific issues that need attention

Keep the tone professional and factual.",
        invoice_number = invoice.invoice_number,
        vendor = invoice.vendor_name,
        amount = invoice.total_amount,
        date = invoice.invoice_date,
        match_pct = validation.match_percentage(),
        is_valid = validation.is_valid,
        confidence = validation.confidence_score,
    )
}

/// Deterministic reasoning used when no generator is configured or the
/// generator fails. Fully determined by the inputs and the chosen action.
pub(crate) fn fallback_reasoning(
    invoice: &Invoice,
    validation: &ValidationResult,
    violations: &[BusinessRuleViolation],
    action: ActionType,
) -> String {
    match action {
        ActionType::Approve => format!(
            "Invoice {} from {} for ${} is approved. Purchase order validation passed \
             with {:.1}% line item match and no critical violations found.",
            invoice.invoice_number,
            invoice.vendor_name,
            invoice.total_amount,
            validation.match_percentage(),
        ),
        ActionType::Reject => {
            let critical: Vec<&BusinessRuleViolation> = violations
                .iter()
                .filter(|v| v.severity == Severity::Critical)
                .collect();
            let key_issues = critical
                .iter()
                .take(2)
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Invoice {} is rejected due to {} critical violation(s). Key issues: {}",
                invoice.invoice_number,
                critical.len(),
                key_issues,
            )
        }
        ActionType::ManualReview => format!(
            "Invoice {} requires manual review. Purchase order {} with {} violation(s) \
             detected. Amount ${} exceeds auto-approval threshold.",
            invoice.invoice_number,
            if validation.po_found {
                "found"
            } else {
                "not found"
            },
            violations.len(),
            invoice.total_amount,
        ),
        ActionType::Hold => format!(
            "Invoice {} is placed on hold. No matching purchase order found for vendor {}. \
             Manual intervention required to identify correct PO or create new authorization.",
            invoice.invoice_number, invoice.vendor_name,
        ),
    }
}
