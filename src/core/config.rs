use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thresholds governing business rule checks and approval routing.
///
/// Injected at engine construction; loading from environment or files is a
/// caller concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Amount at or below which an invoice may be auto-approved absent
    /// violations.
    pub auto_approve_threshold: Decimal,
    /// Amount above which manual review is always required.
    pub require_manual_review_threshold: Decimal,
    /// Maximum tolerated overage above PO authorization, in percent.
    pub max_overage_percentage: Decimal,
    /// Maximum plausible tax rate (as a fraction, e.g. 0.15 = 15%).
    pub max_tax_rate: Decimal,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            auto_approve_threshold: dec!(1000.00),
            require_manual_review_threshold: dec!(5000.00),
            max_overage_percentage: dec!(10.0),
            max_tax_rate: dec!(0.15),
        }
    }
}
