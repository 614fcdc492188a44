use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{BusinessRuleViolation, Invoice, Severity, ViolationType};

/// Issue detected while matching one invoice line against the PO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMatchIssue {
    QuantityMismatch,
    PriceMismatch,
    ItemNotFound,
}

/// Match details for a single invoice line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemMatch {
    pub invoice_description: String,
    /// Whether a PO line item was found for this invoice line.
    pub matched: bool,
    pub po_description: Option<String>,
    pub quantity_match: bool,
    pub price_match: bool,
    pub issues: Vec<LineMatchIssue>,
}

/// Aggregate result of validating one invoice against its matched PO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no violations were detected.
    pub is_valid: bool,
    /// Confidence in the validation, in `[0, 1]`.
    pub confidence_score: f64,

    /// Whether a matching PO was found.
    pub po_found: bool,
    pub po_number: Option<String>,
    pub po_match_confidence: Option<f64>,

    /// Per-line matching results, in invoice order.
    pub line_item_matches: Vec<LineItemMatch>,
    pub total_line_items: usize,
    pub matched_line_items: usize,

    /// Invoice total minus PO authorization.
    pub amount_difference: Option<Decimal>,
    /// Difference as a percentage of the PO authorization.
    pub amount_difference_percentage: Option<Decimal>,
    /// Amount exceeding the PO authorization, floored at zero.
    pub overage_amount: Option<Decimal>,
    pub overage_percentage: Option<Decimal>,

    pub violations: Vec<BusinessRuleViolation>,
    pub critical_violations: usize,
    pub high_violations: usize,

    pub validated_at: DateTime<Utc>,
    pub processing_time_ms: Option<u64>,
}

impl ValidationResult {
    /// Result for an invoice with no matching purchase order.
    ///
    /// Carries a HIGH `PO_NOT_FOUND` violation, so the decision table routes
    /// these invoices to manual review rather than hold.
    pub fn po_not_found(invoice: &Invoice) -> Self {
        Self {
            is_valid: false,
            confidence_score: 0.0,
            po_found: false,
            po_number: None,
            po_match_confidence: None,
            line_item_matches: Vec::new(),
            total_line_items: invoice.line_items.len(),
            matched_line_items: 0,
            amount_difference: None,
            amount_difference_percentage: None,
            overage_amount: None,
            overage_percentage: None,
            violations: vec![
                BusinessRuleViolation::new(
                    ViolationType::PoNotFound,
                    Severity::High,
                    format!(
                        "No matching purchase order found for vendor {}",
                        invoice.vendor_name
                    ),
                )
                .with_field("po_reference"),
            ],
            critical_violations: 0,
            high_violations: 1,
            validated_at: Utc::now(),
            processing_time_ms: None,
        }
    }

    /// Violations with the given severity.
    pub fn violations_by_severity(&self, severity: Severity) -> Vec<&BusinessRuleViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    pub fn has_critical_violations(&self) -> bool {
        self.critical_violations > 0
    }

    pub fn has_high_violations(&self) -> bool {
        self.high_violations > 0
    }

    /// Percentage of invoice line items that matched a PO line.
    pub fn match_percentage(&self) -> f64 {
        if self.total_line_items == 0 {
            return 0.0;
        }
        self.matched_line_items as f64 / self.total_line_items as f64 * 100.0
    }
}
