//! Property-based tests for scoring clamps and decision determinism.

use apmatch::core::*;
use apmatch::matching::{MemoryPoStore, PoMatcher, line_item_match_score, text_similarity};
use apmatch::recommend::{ActionType, RecommendationEngine};
use apmatch::rules::BusinessRulesEngine;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Invoice with one consistent line: quantity in [1, 50), unit price in
/// (0, 1000.00), zero tax.
fn arb_invoice() -> impl Strategy<Value = Invoice> {
    (1u32..50, 1i64..100_000).prop_map(|(quantity, cents)| {
        let unit_price = Decimal::new(cents, 2);
        let line_total = Decimal::from(quantity) * unit_price;
        InvoiceBuilder::new("INV-PROP", "Prop Vendor Co.", date(2024, 3, 1), date(2024, 4, 1))
            .amounts(line_total, Decimal::ZERO, line_total)
            .add_line(
                InvoiceLineItem::new("Service item", quantity, unit_price, line_total).unwrap(),
            )
            .build()
            .unwrap()
    })
}

fn arb_po() -> impl Strategy<Value = PurchaseOrder> {
    (1u32..50, 1i64..100_000).prop_map(|(quantity, cents)| {
        let unit_price = Decimal::new(cents, 2);
        let line_total = Decimal::from(quantity) * unit_price;
        PurchaseOrderBuilder::new("PO-PROP", "Prop Vendor Co.", date(2024, 2, 1))
            .total_authorized(line_total)
            .add_line(PoLineItem::new("Service item", quantity, unit_price, line_total).unwrap())
            .build()
            .unwrap()
    })
}

proptest! {
    #[test]
    fn similarity_is_clamped_and_symmetric(a in "[a-z ]{0,40}", b in "[a-z ]{0,40}") {
        let score = text_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
        prop_assert_eq!(score, text_similarity(&b, &a));
    }

    #[test]
    fn line_score_stays_in_unit_range(invoice in arb_invoice(), po in arb_po()) {
        let score = line_item_match_score(&invoice, &po);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn validation_confidence_stays_in_unit_range(invoice in arb_invoice(), po in arb_po()) {
        let matcher = PoMatcher::new(MemoryPoStore::new());
        let result = matcher.validate_invoice_against_po(&invoice, &po);
        prop_assert!((0.0..=1.0).contains(&result.confidence_score));
    }

    #[test]
    fn recommendation_is_clamped_and_idempotent(invoice in arb_invoice(), po in arb_po()) {
        let matcher = PoMatcher::new(MemoryPoStore::new());
        let validation = matcher.validate_invoice_against_po(&invoice, &po);

        let rules = BusinessRulesEngine::new(RuleConfig::default());
        let violations = rules.check_business_rules_at(&invoice, date(2024, 6, 1));

        let engine = RecommendationEngine::new(RuleConfig::default());
        let first = engine.generate_recommendation(&invoice, &validation, &violations);
        let second = engine.generate_recommendation(&invoice, &validation, &violations);

        prop_assert!((0.1..=1.0).contains(&first.confidence_score));
        prop_assert!(matches!(
            first.action,
            ActionType::Approve | ActionType::Reject | ActionType::Hold | ActionType::ManualReview
        ));
        prop_assert_eq!(first.action, second.action);
        prop_assert_eq!(first.risk_level, second.risk_level);
        prop_assert_eq!(first.confidence_score, second.confidence_score);
        prop_assert_eq!(first.reasoning, second.reasoning);
    }
}
