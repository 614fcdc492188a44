use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{
    AMOUNT_TOLERANCE, BusinessRuleViolation, Invoice, RiskLevel, RuleConfig, Severity,
    ViolationType,
};

use super::hooks::{
    AcceptAllContracts, AcceptAllPaymentTerms, ContractValidator, DuplicateCheck,
    NoDuplicateCheck, PaymentTermsValidator,
};

/// Vendor name fragments that flag likely test or placeholder invoices.
const SUSPICIOUS_VENDOR_KEYWORDS: [&str; 4] = ["test", "demo", "sample", "invalid"];

/// Applies business rules and compliance checks to invoices, independent of
/// PO matching.
pub struct BusinessRulesEngine {
    config: RuleConfig,
    duplicates: Box<dyn DuplicateCheck + Send + Sync>,
    contracts: Box<dyn ContractValidator + Send + Sync>,
    payment_terms: Box<dyn PaymentTermsValidator + Send + Sync>,
}

impl BusinessRulesEngine {
    /// Engine with the given thresholds and the always-pass collaborator
    /// implementations.
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config,
            duplicates: Box::new(NoDuplicateCheck),
            contracts: Box::new(AcceptAllContracts),
            payment_terms: Box::new(AcceptAllPaymentTerms),
        }
    }

    pub fn with_duplicate_check(
        mut self,
        check: impl DuplicateCheck + Send + Sync + 'static,
    ) -> Self {
        self.duplicates = Box::new(check);
        self
    }

    pub fn with_contract_validator(
        mut self,
        validator: impl ContractValidator + Send + Sync + 'static,
    ) -> Self {
        self.contracts = Box::new(validator);
        self
    }

    pub fn with_payment_terms_validator(
        mut self,
        validator: impl PaymentTermsValidator + Send + Sync + 'static,
    ) -> Self {
        self.payment_terms = Box::new(validator);
        self
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Apply all business rules, anchoring date checks at today.
    pub fn check_business_rules(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        self.check_business_rules_at(invoice, Utc::now().date_naive())
    }

    /// Apply all business rules with an explicit processing date.
    ///
    /// Deterministic for fixed inputs; the only date-dependent check is the
    /// future invoice date test.
    pub fn check_business_rules_at(
        &self,
        invoice: &Invoice,
        today: NaiveDate,
    ) -> Vec<BusinessRuleViolation> {
        info!(invoice = %invoice.invoice_number, "checking business rules");

        let mut violations = Vec::new();
        violations.extend(self.check_approval_thresholds(invoice));
        violations.extend(self.check_duplicate_invoice(invoice));
        violations.extend(self.validate_tax_calculations(invoice));
        violations.extend(self.validate_vendor_authorization(invoice));
        violations.extend(self.check_contract_terms(invoice));
        violations.extend(self.validate_payment_terms(invoice));
        violations.extend(self.check_suspicious_patterns(invoice, today));
        violations
    }

    fn check_approval_thresholds(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();

        if invoice.total_amount > self.config.auto_approve_threshold {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::AmountExceedsThreshold,
                    Severity::Medium,
                    format!(
                        "Invoice amount {} exceeds auto-approve threshold {}",
                        invoice.total_amount, self.config.auto_approve_threshold
                    ),
                )
                .with_field("total_amount")
                .with_expected(self.config.auto_approve_threshold.to_string())
                .with_actual(invoice.total_amount.to_string())
                .with_rule("AUTO_APPROVE_THRESHOLD"),
            );
        }

        if invoice.total_amount > self.config.require_manual_review_threshold {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::AmountExceedsThreshold,
                    Severity::High,
                    format!(
                        "Invoice amount {} exceeds manual review threshold {}",
                        invoice.total_amount, self.config.require_manual_review_threshold
                    ),
                )
                .with_field("total_amount")
                .with_expected(self.config.require_manual_review_threshold.to_string())
                .with_actual(invoice.total_amount.to_string())
                .with_rule("MANUAL_REVIEW_THRESHOLD"),
            );
        }

        violations
    }

    fn check_duplicate_invoice(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();

        if self.duplicates.is_duplicate(invoice) {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::DuplicateInvoice,
                    Severity::Critical,
                    format!(
                        "Duplicate invoice detected: {} from {}",
                        invoice.invoice_number, invoice.vendor_name
                    ),
                )
                .with_field("invoice_number")
                .with_actual(&invoice.invoice_number)
                .with_rule("DUPLICATE_CHECK"),
            );
        }

        violations
    }

    fn validate_tax_calculations(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();

        if invoice.subtotal_amount > Decimal::ZERO {
            let calculated_rate = invoice.tax_amount / invoice.subtotal_amount;
            if calculated_rate > self.config.max_tax_rate {
                violations.push(
                    BusinessRuleViolation::new(
                        ViolationType::InvalidTaxCalculation,
                        Severity::High,
                        format!(
                            "Tax rate {calculated_rate} exceeds maximum allowed rate {}",
                            self.config.max_tax_rate
                        ),
                    )
                    .with_field("tax_amount")
                    .with_expected(format!("max {}", self.config.max_tax_rate))
                    .with_actual(calculated_rate.to_string())
                    .with_rule("TAX_RATE_CHECK"),
                );
            }
        }

        // TODO: confirm the assumed jurisdiction rate with the product owner —
        // this check hard-codes 10% while max_tax_rate is configurable, so any
        // jurisdiction with a different rate (e.g. 7%) always fails here.
        let expected_tax = invoice.subtotal_amount * dec!(0.1);
        if (invoice.tax_amount - expected_tax).abs() > AMOUNT_TOLERANCE {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::InvalidTaxCalculation,
                    Severity::Medium,
                    format!(
                        "Tax amount {} doesn't match expected calculation {}",
                        invoice.tax_amount, expected_tax
                    ),
                )
                .with_field("tax_amount")
                .with_expected(expected_tax.to_string())
                .with_actual(invoice.tax_amount.to_string())
                .with_rule("TAX_CALCULATION_CHECK"),
            );
        }

        violations
    }

    fn validate_vendor_authorization(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();
        let vendor_lower = invoice.vendor_name.to_lowercase();

        for keyword in SUSPICIOUS_VENDOR_KEYWORDS {
            if vendor_lower.contains(keyword) {
                violations.push(
                    BusinessRuleViolation::new(
                        ViolationType::VendorNotAuthorized,
                        Severity::High,
                        format!("Vendor name contains suspicious keyword: {keyword}"),
                    )
                    .with_field("vendor_name")
                    .with_actual(&invoice.vendor_name)
                    .with_rule("VENDOR_SUSPICIOUS_CHECK"),
                );
                break;
            }
        }

        if invoice.vendor_name.trim().len() < 2 {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::VendorNotAuthorized,
                    Severity::High,
                    "Vendor name is missing or too short",
                )
                .with_field("vendor_name")
                .with_actual(&invoice.vendor_name)
                .with_rule("VENDOR_NAME_CHECK"),
            );
        }

        violations
    }

    fn check_contract_terms(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();

        if let Some(reference) = &invoice.contract_reference {
            if !self.contracts.is_valid_contract(reference) {
                violations.push(
                    BusinessRuleViolation::new(
                        ViolationType::ContractViolation,
                        Severity::High,
                        format!("Invalid or expired contract reference: {reference}"),
                    )
                    .with_field("contract_reference")
                    .with_actual(reference)
                    .with_rule("CONTRACT_VALIDATION"),
                );
            }
        }

        violations
    }

    fn validate_payment_terms(&self, invoice: &Invoice) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();

        if let Some(terms) = &invoice.payment_terms {
            if !self.payment_terms.is_valid_terms(terms) {
                violations.push(
                    BusinessRuleViolation::new(
                        ViolationType::ContractViolation,
                        Severity::Medium,
                        format!("Unusual payment terms: {terms}"),
                    )
                    .with_field("payment_terms")
                    .with_actual(terms)
                    .with_rule("PAYMENT_TERMS_CHECK"),
                );
            }
        }

        violations
    }

    fn check_suspicious_patterns(
        &self,
        invoice: &Invoice,
        today: NaiveDate,
    ) -> Vec<BusinessRuleViolation> {
        let mut violations = Vec::new();

        // Round multiples of 100 above 1000 often indicate estimates.
        if (invoice.total_amount % dec!(100)).is_zero() && invoice.total_amount > dec!(1000) {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::ContractViolation,
                    Severity::Low,
                    format!("Suspicious round number amount: {}", invoice.total_amount),
                )
                .with_field("total_amount")
                .with_actual(invoice.total_amount.to_string())
                .with_rule("ROUND_NUMBER_CHECK"),
            );
        }

        if invoice.total_amount < dec!(1.0) {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::ContractViolation,
                    Severity::Medium,
                    format!("Very small invoice amount: {}", invoice.total_amount),
                )
                .with_field("total_amount")
                .with_actual(invoice.total_amount.to_string())
                .with_rule("SMALL_AMOUNT_CHECK"),
            );
        }

        if invoice.invoice_date > today {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::DeliveryDateIssue,
                    Severity::High,
                    format!("Invoice date is in the future: {}", invoice.invoice_date),
                )
                .with_field("invoice_date")
                .with_actual(invoice.invoice_date.to_string())
                .with_rule("FUTURE_DATE_CHECK"),
            );
        }

        violations
    }
}

/// Aggregated view of a violation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub total_violations: usize,
    pub critical_violations: usize,
    pub high_violations: usize,
    pub medium_violations: usize,
    pub low_violations: usize,
    pub violations_by_type: BTreeMap<ViolationType, usize>,
    pub risk_level: RiskLevel,
}

/// Summarize violations by severity and type, with an overall risk level.
pub fn rule_summary(violations: &[BusinessRuleViolation]) -> RuleSummary {
    let count = |severity: Severity| {
        violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    };

    let mut violations_by_type = BTreeMap::new();
    for violation in violations {
        *violations_by_type.entry(violation.violation_type).or_insert(0) += 1;
    }

    RuleSummary {
        total_violations: violations.len(),
        critical_violations: count(Severity::Critical),
        high_violations: count(Severity::High),
        medium_violations: count(Severity::Medium),
        low_violations: count(Severity::Low),
        violations_by_type,
        risk_level: RiskLevel::from_violations(violations),
    }
}
