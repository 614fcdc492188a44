use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::types::*;

/// Rounding tolerance for all monetary consistency checks.
pub const AMOUNT_TOLERANCE: Decimal = dec!(0.01);

/// Validate invoice construction invariants.
/// Returns all validation errors found (not just the first).
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.total_amount.is_sign_negative() {
        errors.push(ValidationError::new(
            "total_amount",
            "total amount must not be negative",
        ));
    }
    if invoice.tax_amount.is_sign_negative() {
        errors.push(ValidationError::new(
            "tax_amount",
            "tax amount must not be negative",
        ));
    }
    if invoice.subtotal_amount.is_sign_negative() {
        errors.push(ValidationError::new(
            "subtotal_amount",
            "subtotal must not be negative",
        ));
    }

    // total == subtotal + tax
    let expected_total = invoice.subtotal_amount + invoice.tax_amount;
    if (invoice.total_amount - expected_total).abs() > AMOUNT_TOLERANCE {
        errors.push(ValidationError::with_rule(
            "total_amount",
            format!(
                "total amount {} doesn't match subtotal + tax {}",
                invoice.total_amount, expected_total
            ),
            "TOTAL_CONSISTENCY",
        ));
    }

    // subtotal == sum of line totals
    let line_total: Decimal = invoice.line_items.iter().map(|l| l.total_price).sum();
    if (invoice.subtotal_amount - line_total).abs() > AMOUNT_TOLERANCE {
        errors.push(ValidationError::with_rule(
            "subtotal_amount",
            format!(
                "subtotal {} doesn't match sum of line items {}",
                invoice.subtotal_amount, line_total
            ),
            "SUBTOTAL_CONSISTENCY",
        ));
    }

    for (i, line) in invoice.line_items.iter().enumerate() {
        validate_line(
            line.quantity,
            line.unit_price,
            line.total_price,
            &format!("line_items[{i}]"),
            &mut errors,
        );
    }

    errors
}

/// Validate purchase order construction invariants.
/// Returns all validation errors found (not just the first).
pub fn validate_purchase_order(po: &PurchaseOrder) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if po.total_authorized.is_sign_negative() {
        errors.push(ValidationError::new(
            "total_authorized",
            "authorized amount must not be negative",
        ));
    }

    // total_authorized == sum of line totals
    let line_total: Decimal = po.line_items.iter().map(|l| l.total_price).sum();
    if (po.total_authorized - line_total).abs() > AMOUNT_TOLERANCE {
        errors.push(ValidationError::with_rule(
            "total_authorized",
            format!(
                "total authorized {} doesn't match sum of line items {}",
                po.total_authorized, line_total
            ),
            "AUTHORIZED_CONSISTENCY",
        ));
    }

    for (i, line) in po.line_items.iter().enumerate() {
        validate_line(
            line.quantity,
            line.unit_price,
            line.total_price,
            &format!("line_items[{i}]"),
            &mut errors,
        );
    }

    errors
}

// Line items built through the checked constructors already hold this
// invariant; re-checking covers deserialized and hand-assembled documents.
fn validate_line(
    quantity: u32,
    unit_price: Decimal,
    total_price: Decimal,
    prefix: &str,
    errors: &mut Vec<ValidationError>,
) {
    if unit_price.is_sign_negative() {
        errors.push(ValidationError::new(
            format!("{prefix}.unit_price"),
            "unit price must not be negative",
        ));
    }
    if total_price.is_sign_negative() {
        errors.push(ValidationError::new(
            format!("{prefix}.total_price"),
            "total price must not be negative",
        ));
    }

    let expected = Decimal::from(quantity) * unit_price;
    if (total_price - expected).abs() > AMOUNT_TOLERANCE {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.total_price"),
            format!("total price {total_price} doesn't match quantity * unit price {expected}"),
            "LINE_TOTAL_CONSISTENCY",
        ));
    }
}
