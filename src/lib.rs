//! # apmatch
//!
//! Invoice-to-purchase-order reconciliation: multi-strategy PO matching,
//! line-item validation, business rule checks, and deterministic approval
//! recommendations.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Documents enforce their arithmetic invariants at construction, so bad data
//! never enters the decision pipeline. Collaborators (PO lookup, duplicate
//! detection, contract/payment-terms validation, narrative reasoning) are
//! injected behind traits; their failures degrade gracefully instead of
//! aborting the pipeline.
//!
//! ## Quick Start
//!
//! ```rust
//! use apmatch::core::*;
//! use apmatch::matching::{MemoryPoStore, PoMatcher};
//! use apmatch::recommend::{ActionType, RecommendationEngine};
//! use apmatch::rules::BusinessRulesEngine;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//!
//! let mut store = MemoryPoStore::new();
//! store.insert(
//!     PurchaseOrderBuilder::new("PO-2024-0042", "ACME Industrial Supply", date(2024, 5, 2))
//!         .total_authorized(dec!(550.00))
//!         .add_line(PoLineItem::new("Safety gloves", 10, dec!(50.00), dec!(500.00)).unwrap())
//!         .add_line(PoLineItem::new("Applicable sales tax", 1, dec!(50.00), dec!(50.00)).unwrap())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let invoice = InvoiceBuilder::new(
//!     "INV-7731",
//!     "ACME Industrial Supply",
//!     date(2024, 5, 10),
//!     date(2024, 6, 9),
//! )
//! .amounts(dec!(550.00), dec!(50.00), dec!(500.00))
//! .add_line(InvoiceLineItem::new("Safety gloves", 10, dec!(50.00), dec!(500.00)).unwrap())
//! .po_reference("PO-2024-0042")
//! .build()
//! .unwrap();
//!
//! let matcher = PoMatcher::new(&store);
//! let po = matcher.find_matching_po(&invoice).expect("PO resolved");
//! let validation = matcher.validate_invoice_against_po(&invoice, &po);
//!
//! let rules = BusinessRulesEngine::new(RuleConfig::default());
//! let violations = rules.check_business_rules(&invoice);
//!
//! let engine = RecommendationEngine::new(RuleConfig::default());
//! let recommendation = engine.generate_recommendation(&invoice, &validation, &violations);
//!
//! assert_eq!(recommendation.action, ActionType::Approve);
//! assert!(recommendation.auto_approvable);
//! ```

pub mod core;
pub mod matching;
pub mod recommend;
pub mod rules;

// Re-export core types at crate root for convenience
pub use crate::core::*;
