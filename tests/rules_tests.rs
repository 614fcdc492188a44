use apmatch::core::*;
use apmatch::rules::{
    BusinessRulesEngine, ContractValidator, DuplicateCheck, PaymentTermsValidator, rule_summary,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 1)
}

/// Invoice with one line covering the subtotal.
fn invoice_with_amounts(
    number: &str,
    vendor: &str,
    total: Decimal,
    tax: Decimal,
    subtotal: Decimal,
) -> Invoice {
    InvoiceBuilder::new(number, vendor, date(2024, 1, 15), date(2024, 2, 15))
        .amounts(total, tax, subtotal)
        .add_line(InvoiceLineItem::new("Professional services", 1, subtotal, subtotal).unwrap())
        .build()
        .unwrap()
}

fn engine() -> BusinessRulesEngine {
    BusinessRulesEngine::new(RuleConfig::default())
}

fn violations_of(
    violations: &[BusinessRuleViolation],
    violation_type: ViolationType,
) -> Vec<&BusinessRuleViolation> {
    violations
        .iter()
        .filter(|v| v.violation_type == violation_type)
        .collect()
}

// --- Thresholds ---

#[test]
fn amount_over_auto_approve_threshold() {
    let invoice = invoice_with_amounts(
        "INV-1001",
        "ABC Supplies Inc.",
        dec!(1500.00),
        dec!(136.36),
        dec!(1363.64),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    let threshold = violations_of(&violations, ViolationType::AmountExceedsThreshold);
    assert_eq!(threshold.len(), 1);
    assert_eq!(threshold[0].severity, Severity::Medium);
    assert_eq!(threshold[0].rule_id.as_deref(), Some("AUTO_APPROVE_THRESHOLD"));
}

#[test]
fn both_thresholds_fire_above_manual_review_limit() {
    let invoice = invoice_with_amounts(
        "INV-1002",
        "ABC Supplies Inc.",
        dec!(6600.00),
        dec!(600.00),
        dec!(6000.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    let threshold = violations_of(&violations, ViolationType::AmountExceedsThreshold);
    assert_eq!(threshold.len(), 2);
    assert!(threshold.iter().any(|v| v.severity == Severity::Medium));
    assert!(threshold.iter().any(|v| v.severity == Severity::High));
}

#[test]
fn clean_invoice_produces_no_violations() {
    let invoice = invoice_with_amounts(
        "INV-1003",
        "ABC Supplies Inc.",
        dec!(550.00),
        dec!(50.00),
        dec!(500.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());
    assert!(violations.is_empty(), "unexpected: {violations:?}");
}

// --- Tax ---

#[test]
fn tax_rate_above_maximum_is_high_severity() {
    let invoice = invoice_with_amounts(
        "INV-1004",
        "ABC Supplies Inc.",
        dec!(1200.00),
        dec!(200.00),
        dec!(1000.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    assert!(
        violations
            .iter()
            .any(|v| v.violation_type == ViolationType::InvalidTaxCalculation
                && v.severity == Severity::High
                && v.rule_id.as_deref() == Some("TAX_RATE_CHECK"))
    );
}

#[test]
fn seven_percent_tax_fails_only_the_flat_rate_check() {
    // 7% is under the configured maximum, but the calculation check assumes
    // exactly 10% — a known inconsistency, preserved
    let invoice = invoice_with_amounts(
        "INV-1005",
        "ABC Supplies Inc.",
        dec!(963.00),
        dec!(63.00),
        dec!(900.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    let tax = violations_of(&violations, ViolationType::InvalidTaxCalculation);
    assert_eq!(tax.len(), 1);
    assert_eq!(tax[0].severity, Severity::Medium);
    assert_eq!(tax[0].rule_id.as_deref(), Some("TAX_CALCULATION_CHECK"));
}

// --- Vendor sanity ---

#[test]
fn suspicious_vendor_keyword_is_flagged() {
    let invoice = invoice_with_amounts(
        "INV-1006",
        "Demo Vendor LLC",
        dec!(550.00),
        dec!(50.00),
        dec!(500.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    let vendor = violations_of(&violations, ViolationType::VendorNotAuthorized);
    assert_eq!(vendor.len(), 1);
    assert_eq!(vendor[0].severity, Severity::High);
    assert_eq!(vendor[0].rule_id.as_deref(), Some("VENDOR_SUSPICIOUS_CHECK"));
}

#[test]
fn short_vendor_name_is_flagged() {
    let invoice = invoice_with_amounts("INV-1007", "X", dec!(550.00), dec!(50.00), dec!(500.00));
    let violations = engine().check_business_rules_at(&invoice, today());

    assert!(
        violations
            .iter()
            .any(|v| v.violation_type == ViolationType::VendorNotAuthorized
                && v.rule_id.as_deref() == Some("VENDOR_NAME_CHECK"))
    );
}

// --- Suspicious patterns ---

#[test]
fn round_amount_above_one_thousand_is_low_severity() {
    let invoice = invoice_with_amounts(
        "INV-1008",
        "ABC Supplies Inc.",
        dec!(2200.00),
        dec!(200.00),
        dec!(2000.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    assert!(
        violations
            .iter()
            .any(|v| v.severity == Severity::Low
                && v.rule_id.as_deref() == Some("ROUND_NUMBER_CHECK"))
    );
}

#[test]
fn round_amount_below_one_thousand_is_not_flagged() {
    let invoice = invoice_with_amounts(
        "INV-1009",
        "ABC Supplies Inc.",
        dec!(880.00),
        dec!(80.00),
        dec!(800.00),
    );
    let violations = engine().check_business_rules_at(&invoice, today());
    assert!(
        !violations
            .iter()
            .any(|v| v.rule_id.as_deref() == Some("ROUND_NUMBER_CHECK"))
    );
}

#[test]
fn tiny_amount_is_medium_severity() {
    let invoice = invoice_with_amounts(
        "INV-1010",
        "ABC Supplies Inc.",
        dec!(0.55),
        dec!(0.05),
        dec!(0.50),
    );
    let violations = engine().check_business_rules_at(&invoice, today());

    assert!(
        violations
            .iter()
            .any(|v| v.severity == Severity::Medium
                && v.rule_id.as_deref() == Some("SMALL_AMOUNT_CHECK"))
    );
}

#[test]
fn future_invoice_date_is_flagged() {
    let invoice = InvoiceBuilder::new("INV-1011", "ABC Supplies Inc.", date(2024, 6, 2), date(2024, 7, 2))
        .amounts(dec!(550.00), dec!(50.00), dec!(500.00))
        .add_line(InvoiceLineItem::new("Professional services", 1, dec!(500.00), dec!(500.00)).unwrap())
        .build()
        .unwrap();

    let violations = engine().check_business_rules_at(&invoice, today());
    let dated = violations_of(&violations, ViolationType::DeliveryDateIssue);
    assert_eq!(dated.len(), 1);
    assert_eq!(dated[0].severity, Severity::High);
    assert_eq!(dated[0].rule_id.as_deref(), Some("FUTURE_DATE_CHECK"));

    // same invoice processed after its date is clean
    let later = engine().check_business_rules_at(&invoice, date(2024, 6, 2));
    assert!(violations_of(&later, ViolationType::DeliveryDateIssue).is_empty());
}

// --- Collaborator seams ---

struct AlwaysDuplicate;

impl DuplicateCheck for AlwaysDuplicate {
    fn is_duplicate(&self, _: &Invoice) -> bool {
        true
    }
}

#[test]
fn duplicate_detection_is_critical() {
    let invoice = invoice_with_amounts(
        "INV-1012",
        "ABC Supplies Inc.",
        dec!(550.00),
        dec!(50.00),
        dec!(500.00),
    );
    let engine = engine().with_duplicate_check(AlwaysDuplicate);
    let violations = engine.check_business_rules_at(&invoice, today());

    let duplicates = violations_of(&violations, ViolationType::DuplicateInvoice);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].severity, Severity::Critical);
    assert_eq!(duplicates[0].rule_id.as_deref(), Some("DUPLICATE_CHECK"));
}

struct RejectAllContracts;

impl ContractValidator for RejectAllContracts {
    fn is_valid_contract(&self, _: &str) -> bool {
        false
    }
}

#[test]
fn invalid_contract_reference_is_flagged() {
    let invoice = InvoiceBuilder::new("INV-1013", "ABC Supplies Inc.", date(2024, 1, 15), date(2024, 2, 15))
        .amounts(dec!(550.00), dec!(50.00), dec!(500.00))
        .add_line(InvoiceLineItem::new("Professional services", 1, dec!(500.00), dec!(500.00)).unwrap())
        .contract_reference("CNT-2024-100")
        .build()
        .unwrap();

    let engine = engine().with_contract_validator(RejectAllContracts);
    let violations = engine.check_business_rules_at(&invoice, today());

    let contract = violations_of(&violations, ViolationType::ContractViolation);
    assert_eq!(contract.len(), 1);
    assert_eq!(contract[0].severity, Severity::High);
    assert_eq!(contract[0].rule_id.as_deref(), Some("CONTRACT_VALIDATION"));
}

#[test]
fn missing_contract_reference_skips_the_check() {
    let invoice = invoice_with_amounts(
        "INV-1014",
        "ABC Supplies Inc.",
        dec!(550.00),
        dec!(50.00),
        dec!(500.00),
    );
    let engine = engine().with_contract_validator(RejectAllContracts);
    let violations = engine.check_business_rules_at(&invoice, today());
    assert!(violations.is_empty());
}

struct RejectAllTerms;

impl PaymentTermsValidator for RejectAllTerms {
    fn is_valid_terms(&self, _: &str) -> bool {
        false
    }
}

#[test]
fn unusual_payment_terms_are_medium_severity() {
    let invoice = InvoiceBuilder::new("INV-1015", "ABC Supplies Inc.", date(2024, 1, 15), date(2024, 2, 15))
        .amounts(dec!(550.00), dec!(50.00), dec!(500.00))
        .add_line(InvoiceLineItem::new("Professional services", 1, dec!(500.00), dec!(500.00)).unwrap())
        .payment_terms("Net 120")
        .build()
        .unwrap();

    let engine = engine().with_payment_terms_validator(RejectAllTerms);
    let violations = engine.check_business_rules_at(&invoice, today());

    let terms = violations_of(&violations, ViolationType::ContractViolation);
    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].severity, Severity::Medium);
    assert_eq!(terms[0].rule_id.as_deref(), Some("PAYMENT_TERMS_CHECK"));
}

#[test]
fn default_collaborators_always_pass() {
    let invoice = InvoiceBuilder::new("INV-1016", "ABC Supplies Inc.", date(2024, 1, 15), date(2024, 2, 15))
        .amounts(dec!(550.00), dec!(50.00), dec!(500.00))
        .add_line(InvoiceLineItem::new("Professional services", 1, dec!(500.00), dec!(500.00)).unwrap())
        .contract_reference("CNT-2024-100")
        .payment_terms("Net 30")
        .build()
        .unwrap();

    let violations = engine().check_business_rules_at(&invoice, today());
    assert!(violations.is_empty(), "unexpected: {violations:?}");
}

// --- Summary ---

#[test]
fn rule_summary_counts_by_severity_and_type() {
    let violations = vec![
        BusinessRuleViolation::new(ViolationType::DuplicateInvoice, Severity::Critical, "dup"),
        BusinessRuleViolation::new(ViolationType::AmountExceedsThreshold, Severity::High, "big"),
        BusinessRuleViolation::new(ViolationType::AmountExceedsThreshold, Severity::Medium, "big"),
        BusinessRuleViolation::new(ViolationType::ContractViolation, Severity::Low, "round"),
    ];

    let summary = rule_summary(&violations);
    assert_eq!(summary.total_violations, 4);
    assert_eq!(summary.critical_violations, 1);
    assert_eq!(summary.high_violations, 1);
    assert_eq!(summary.medium_violations, 1);
    assert_eq!(summary.low_violations, 1);
    assert_eq!(
        summary.violations_by_type[&ViolationType::AmountExceedsThreshold],
        2
    );
    assert_eq!(summary.risk_level, RiskLevel::Critical);
}

#[test]
fn rule_summary_risk_priority() {
    assert_eq!(rule_summary(&[]).risk_level, RiskLevel::Low);

    let low_only = vec![BusinessRuleViolation::new(
        ViolationType::ContractViolation,
        Severity::Low,
        "round",
    )];
    assert_eq!(rule_summary(&low_only).risk_level, RiskLevel::Low);

    let medium = vec![BusinessRuleViolation::new(
        ViolationType::AmountExceedsThreshold,
        Severity::Medium,
        "big",
    )];
    assert_eq!(rule_summary(&medium).risk_level, RiskLevel::Medium);

    let high = vec![BusinessRuleViolation::new(
        ViolationType::VendorNotAuthorized,
        Severity::High,
        "vendor",
    )];
    assert_eq!(rule_summary(&high).risk_level, RiskLevel::High);
}
