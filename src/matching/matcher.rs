use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};

use crate::core::{
    AMOUNT_TOLERANCE, BusinessRuleViolation, Invoice, PurchaseOrder, Severity, ViolationType,
};

use super::lookup::PoLookup;
use super::result::{LineItemMatch, LineMatchIssue, ValidationResult};
use super::similarity::{text_similarity, vendor_similarity};

/// Unit price deviation tolerated when comparing invoice and PO lines,
/// relative to the PO price.
const UNIT_PRICE_TOLERANCE: Decimal = dec!(0.05);

/// Minimum line-item match score for strategy 3 to accept a PO.
const LINE_SCORE_CUTOFF: f64 = 0.5;

/// Minimum vendor-name similarity for strategy 4 to accept a PO.
const VENDOR_SIMILARITY_CUTOFF: f64 = 0.8;

/// Match confidence reported when any cascade strategy succeeds.
const PO_MATCH_CONFIDENCE: f64 = 0.95;

/// Resolves invoices to purchase orders and validates them line by line.
pub struct PoMatcher<L> {
    lookup: L,
}

impl<L: PoLookup> PoMatcher<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Find the corresponding purchase order for an invoice.
    ///
    /// Strategies run in fixed order, first success wins:
    /// 1. direct `po_reference` lookup,
    /// 2. same vendor + matching amount,
    /// 3. same vendor + line-item score above [`LINE_SCORE_CUTOFF`],
    /// 4. fuzzy vendor name across all POs.
    ///
    /// Lookup failures inside a strategy degrade to "strategy failed, try
    /// next"; the operation never propagates collaborator errors.
    pub fn find_matching_po(&self, invoice: &Invoice) -> Option<PurchaseOrder> {
        info!(invoice = %invoice.invoice_number, "finding matching purchase order");

        if let Some(reference) = &invoice.po_reference {
            match self.lookup.by_number(reference) {
                Ok(Some(po)) => {
                    info!(po = %po.po_number, "found PO by direct reference");
                    return Some(po);
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "direct reference lookup failed"),
            }
        }

        if let Some(po) = self.find_by_vendor_and_amount(invoice) {
            return Some(po);
        }
        if let Some(po) = self.find_by_line_items(invoice) {
            return Some(po);
        }
        self.find_by_fuzzy_vendor(invoice)
    }

    /// Compare invoice details against the terms of a purchase order.
    pub fn validate_invoice_against_po(
        &self,
        invoice: &Invoice,
        po: &PurchaseOrder,
    ) -> ValidationResult {
        info!(
            invoice = %invoice.invoice_number,
            po = %po.po_number,
            "validating invoice against purchase order"
        );
        let started = Instant::now();

        let mut violations = Vec::new();
        let mut line_item_matches = Vec::new();

        if invoice.vendor_name.to_lowercase() != po.vendor_name.to_lowercase() {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::VendorNotAuthorized,
                    Severity::High,
                    format!(
                        "Invoice vendor '{}' doesn't match PO vendor '{}'",
                        invoice.vendor_name, po.vendor_name
                    ),
                )
                .with_field("vendor_name")
                .with_expected(&po.vendor_name)
                .with_actual(&invoice.vendor_name),
            );
        }

        let mut matched_line_items = 0usize;
        for item in &invoice.line_items {
            let po_item = po
                .line_item_by_description(&item.description)
                .or_else(|| item.sku.as_deref().and_then(|sku| po.line_item_by_sku(sku)));

            let mut line_match = LineItemMatch {
                invoice_description: item.description.clone(),
                matched: po_item.is_some(),
                po_description: po_item.map(|p| p.description.clone()),
                quantity_match: false,
                price_match: false,
                issues: Vec::new(),
            };

            if let Some(po_item) = po_item {
                matched_line_items += 1;

                if item.quantity != po_item.quantity {
                    violations.push(
                        BusinessRuleViolation::new(
                            ViolationType::QuantityMismatch,
                            Severity::Medium,
                            format!(
                                "Quantity mismatch for '{}': expected {}, got {}",
                                item.description, po_item.quantity, item.quantity
                            ),
                        )
                        .with_field("quantity")
                        .with_expected(po_item.quantity.to_string())
                        .with_actual(item.quantity.to_string()),
                    );
                    line_match.issues.push(LineMatchIssue::QuantityMismatch);
                } else {
                    line_match.quantity_match = true;
                }

                if !unit_price_within_tolerance(item.unit_price, po_item.unit_price) {
                    violations.push(
                        BusinessRuleViolation::new(
                            ViolationType::PriceMismatch,
                            Severity::Medium,
                            format!(
                                "Price mismatch for '{}': expected {}, got {}",
                                item.description, po_item.unit_price, item.unit_price
                            ),
                        )
                        .with_field("unit_price")
                        .with_expected(po_item.unit_price.to_string())
                        .with_actual(item.unit_price.to_string()),
                    );
                    line_match.issues.push(LineMatchIssue::PriceMismatch);
                } else {
                    line_match.price_match = true;
                }
            } else {
                // Unmatched items carry the QUANTITY_MISMATCH tag; downstream
                // routing depends only on severity and count.
                violations.push(
                    BusinessRuleViolation::new(
                        ViolationType::QuantityMismatch,
                        Severity::High,
                        format!("Line item '{}' not found in PO", item.description),
                    )
                    .with_field("description")
                    .with_actual(&item.description),
                );
                line_match.issues.push(LineMatchIssue::ItemNotFound);
            }

            line_item_matches.push(line_match);
        }

        let amount_difference = invoice.total_amount - po.total_authorized;
        let amount_difference_percentage = percentage_of(amount_difference, po.total_authorized);
        let overage_amount = amount_difference.max(Decimal::ZERO);
        let overage_percentage = percentage_of(overage_amount, po.total_authorized);

        if overage_amount > Decimal::ZERO {
            violations.push(
                BusinessRuleViolation::new(
                    ViolationType::OverageExceedsLimit,
                    Severity::Medium,
                    format!(
                        "Invoice amount {} exceeds PO authorization {} by {}",
                        invoice.total_amount, po.total_authorized, overage_amount
                    ),
                )
                .with_field("total_amount")
                .with_expected(po.total_authorized.to_string())
                .with_actual(invoice.total_amount.to_string()),
            );
        }

        let critical_violations = count_severity(&violations, Severity::Critical);
        let high_violations = count_severity(&violations, Severity::High);
        let confidence_score =
            validation_confidence(matched_line_items, invoice.line_items.len(), &violations);

        ValidationResult {
            is_valid: violations.is_empty(),
            confidence_score,
            po_found: true,
            po_number: Some(po.po_number.clone()),
            po_match_confidence: Some(PO_MATCH_CONFIDENCE),
            line_item_matches,
            total_line_items: invoice.line_items.len(),
            matched_line_items,
            amount_difference: Some(amount_difference),
            amount_difference_percentage: Some(amount_difference_percentage),
            overage_amount: Some(overage_amount),
            overage_percentage: Some(overage_percentage),
            violations,
            critical_violations,
            high_violations,
            validated_at: Utc::now(),
            processing_time_ms: Some(started.elapsed().as_millis() as u64),
        }
    }

    fn vendor_pos(&self, invoice: &Invoice) -> Vec<PurchaseOrder> {
        match self.lookup.by_vendor(&invoice.vendor_name) {
            Ok(pos) => pos,
            Err(err) => {
                warn!(error = %err, "vendor lookup failed");
                Vec::new()
            }
        }
    }

    /// Strategy 2: same vendor, authorized amount within [`AMOUNT_TOLERANCE`]
    /// of the invoice total. First enumerated match wins.
    fn find_by_vendor_and_amount(&self, invoice: &Invoice) -> Option<PurchaseOrder> {
        let po = self
            .vendor_pos(invoice)
            .into_iter()
            .find(|po| (po.total_authorized - invoice.total_amount).abs() <= AMOUNT_TOLERANCE)?;
        info!(po = %po.po_number, "found PO by vendor and amount match");
        Some(po)
    }

    /// Strategy 3: same vendor, highest line-item score above the cutoff.
    fn find_by_line_items(&self, invoice: &Invoice) -> Option<PurchaseOrder> {
        let mut best: Option<(f64, PurchaseOrder)> = None;
        for po in self.vendor_pos(invoice) {
            let score = line_item_match_score(invoice, &po);
            if score > LINE_SCORE_CUTOFF && best.as_ref().is_none_or(|(b, _)| score > *b) {
                best = Some((score, po));
            }
        }

        let (score, po) = best?;
        info!(po = %po.po_number, score, "found PO by line item matching");
        Some(po)
    }

    /// Strategy 4: highest vendor-name similarity above the cutoff, across
    /// all POs regardless of vendor.
    fn find_by_fuzzy_vendor(&self, invoice: &Invoice) -> Option<PurchaseOrder> {
        let all = match self.lookup.all() {
            Ok(pos) => pos,
            Err(err) => {
                warn!(error = %err, "full PO lookup failed");
                return None;
            }
        };

        let mut best: Option<(f64, PurchaseOrder)> = None;
        for po in all {
            let score = vendor_similarity(&invoice.vendor_name, &po.vendor_name);
            if score > VENDOR_SIMILARITY_CUTOFF && best.as_ref().is_none_or(|(b, _)| score > *b) {
                best = Some((score, po));
            }
        }

        let (score, po) = best?;
        info!(po = %po.po_number, score, "found PO by fuzzy vendor matching");
        Some(po)
    }
}

/// Score how well the invoice's line items match a PO's, in `[0, 1]`.
///
/// Each invoice line takes its best score against any PO line, weighted
/// 0.6 description similarity, 0.2 exact quantity, 0.2 unit price within
/// tolerance; the result averages over all invoice lines.
pub fn line_item_match_score(invoice: &Invoice, po: &PurchaseOrder) -> f64 {
    if invoice.line_items.is_empty() || po.line_items.is_empty() {
        return 0.0;
    }

    let mut total_score = 0.0;
    for invoice_item in &invoice.line_items {
        let mut best_item_score: f64 = 0.0;

        for po_item in &po.line_items {
            let desc_similarity = text_similarity(&invoice_item.description, &po_item.description);
            let qty_match = if invoice_item.quantity == po_item.quantity {
                1.0
            } else {
                0.0
            };
            let price_match =
                if unit_price_within_tolerance(invoice_item.unit_price, po_item.unit_price) {
                    1.0
                } else {
                    0.0
                };

            let item_score = desc_similarity * 0.6 + qty_match * 0.2 + price_match * 0.2;
            best_item_score = best_item_score.max(item_score);
        }

        total_score += best_item_score;
    }

    total_score / invoice.line_items.len() as f64
}

fn unit_price_within_tolerance(invoice_price: Decimal, po_price: Decimal) -> bool {
    (invoice_price - po_price).abs() <= po_price * UNIT_PRICE_TOLERANCE
}

fn percentage_of(amount: Decimal, base: Decimal) -> Decimal {
    if base > Decimal::ZERO {
        amount / base * dec!(100)
    } else {
        Decimal::ZERO
    }
}

fn count_severity(violations: &[BusinessRuleViolation], severity: Severity) -> usize {
    violations.iter().filter(|v| v.severity == severity).count()
}

/// Confidence in a validation: line-item match ratio, reduced by violation
/// count (capped at 0.5) and critical violations, floored at zero.
fn validation_confidence(
    matched_items: usize,
    total_items: usize,
    violations: &[BusinessRuleViolation],
) -> f64 {
    if total_items == 0 {
        return 0.0;
    }

    let item_confidence = matched_items as f64 / total_items as f64;
    let violation_penalty = (violations.len() as f64 * 0.1).min(0.5);
    let critical_penalty = count_severity(violations, Severity::Critical) as f64 * 0.2;

    (item_confidence - violation_penalty - critical_penalty).max(0.0)
}
