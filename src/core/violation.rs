use serde::{Deserialize, Serialize};

/// Severity of a business rule violation, ordered by escalation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types of business rule violations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    AmountExceedsThreshold,
    DuplicateInvoice,
    InvalidTaxCalculation,
    VendorNotAuthorized,
    PoNotFound,
    QuantityMismatch,
    PriceMismatch,
    DeliveryDateIssue,
    ContractViolation,
    OverageExceedsLimit,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmountExceedsThreshold => "AMOUNT_EXCEEDS_THRESHOLD",
            Self::DuplicateInvoice => "DUPLICATE_INVOICE",
            Self::InvalidTaxCalculation => "INVALID_TAX_CALCULATION",
            Self::VendorNotAuthorized => "VENDOR_NOT_AUTHORIZED",
            Self::PoNotFound => "PO_NOT_FOUND",
            Self::QuantityMismatch => "QUANTITY_MISMATCH",
            Self::PriceMismatch => "PRICE_MISMATCH",
            Self::DeliveryDateIssue => "DELIVERY_DATE_ISSUE",
            Self::ContractViolation => "CONTRACT_VIOLATION",
            Self::OverageExceedsLimit => "OVERAGE_EXCEEDS_LIMIT",
        }
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall risk classification derived from a violation set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Highest-priority severity present wins: CRITICAL > HIGH > MEDIUM > LOW.
    pub fn from_violations(violations: &[BusinessRuleViolation]) -> Self {
        if violations.iter().any(|v| v.severity == Severity::Critical) {
            Self::Critical
        } else if violations.iter().any(|v| v.severity == Severity::High) {
            Self::High
        } else if violations.iter().any(|v| v.severity == Severity::Medium) {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// A detected deviation from business policy or PO terms.
///
/// Immutable value object: created during validation, consumed by the
/// recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRuleViolation {
    pub violation_type: ViolationType,
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
    /// Field that caused the violation.
    pub field_name: Option<String>,
    /// Expected value, stringified.
    pub expected_value: Option<String>,
    /// Actual value, stringified.
    pub actual_value: Option<String>,
    /// Business rule identifier (e.g. "AUTO_APPROVE_THRESHOLD").
    pub rule_id: Option<String>,
}

impl BusinessRuleViolation {
    pub fn new(
        violation_type: ViolationType,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            severity,
            description: description.into(),
            field_name: None,
            expected_value: None,
            actual_value: None,
            rule_id: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field_name = Some(field.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected_value = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual_value = Some(actual.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule_id = Some(rule.into());
        self
    }
}

impl std::fmt::Display for BusinessRuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity, self.violation_type, self.description
        )
    }
}
