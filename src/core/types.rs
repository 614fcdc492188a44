use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReconcileError;
use super::validation::AMOUNT_TOLERANCE;

/// One priced row on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Item description.
    pub description: String,
    /// Quantity invoiced.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Total price for this line.
    pub total_price: Decimal,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Reference to a PO line item.
    pub po_reference: Option<String>,
}

impl InvoiceLineItem {
    /// Create a line item, enforcing `total_price == quantity * unit_price`
    /// within the rounding tolerance.
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        total_price: Decimal,
    ) -> Result<Self, ReconcileError> {
        check_line_amounts(quantity, unit_price, total_price)?;
        Ok(Self {
            description: description.into(),
            quantity,
            unit_price,
            total_price,
            sku: None,
            po_reference: None,
        })
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_po_reference(mut self, reference: impl Into<String>) -> Self {
        self.po_reference = Some(reference.into());
        self
    }
}

/// One priced row on a purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLineItem {
    /// Item description.
    pub description: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Agreed price per unit.
    pub unit_price: Decimal,
    /// Total price for this line.
    pub total_price: Decimal,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Part number.
    pub part_number: Option<String>,
    /// Expected delivery date.
    pub delivery_date: Option<NaiveDate>,
}

impl PoLineItem {
    /// Create a line item, enforcing `total_price == quantity * unit_price`
    /// within the rounding tolerance.
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        total_price: Decimal,
    ) -> Result<Self, ReconcileError> {
        check_line_amounts(quantity, unit_price, total_price)?;
        Ok(Self {
            description: description.into(),
            quantity,
            unit_price,
            total_price,
            sku: None,
            part_number: None,
            delivery_date: None,
        })
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = Some(part_number.into());
        self
    }

    pub fn with_delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }
}

fn check_line_amounts(
    quantity: u32,
    unit_price: Decimal,
    total_price: Decimal,
) -> Result<(), ReconcileError> {
    if unit_price.is_sign_negative() {
        return Err(ReconcileError::Validation(format!(
            "unit price {unit_price} must not be negative"
        )));
    }
    if total_price.is_sign_negative() {
        return Err(ReconcileError::Validation(format!(
            "total price {total_price} must not be negative"
        )));
    }
    let expected = Decimal::from(quantity) * unit_price;
    if (total_price - expected).abs() > AMOUNT_TOLERANCE {
        return Err(ReconcileError::Validation(format!(
            "total price {total_price} doesn't match quantity * unit price {expected}"
        )));
    }
    Ok(())
}

/// A supplier invoice as extracted from an uploaded document.
///
/// Immutable during matching and validation; the extraction collaborator
/// creates one per document and may stamp post-hoc metadata (file path,
/// extraction timestamp) before handing it to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice identifier.
    pub invoice_number: String,
    /// Name of the vendor/supplier.
    pub vendor_name: String,
    /// Vendor identifier.
    pub vendor_id: Option<String>,
    /// Date the invoice was issued.
    pub invoice_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Total invoice amount (subtotal + tax).
    pub total_amount: Decimal,
    /// Total tax amount.
    pub tax_amount: Decimal,
    /// Subtotal before tax.
    pub subtotal_amount: Decimal,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Invoice line items, in document order.
    pub line_items: Vec<InvoiceLineItem>,
    /// Reference to a purchase order.
    pub po_reference: Option<String>,
    /// Reference to a contract.
    pub contract_reference: Option<String>,
    /// Payment terms free text.
    pub payment_terms: Option<String>,
    /// Shipping address.
    pub shipping_address: Option<String>,
    /// Billing address.
    pub billing_address: Option<String>,
    /// Additional notes.
    pub notes: Option<String>,
    /// Path to the original document.
    pub file_path: Option<String>,
    /// When the data was extracted.
    pub extracted_at: Option<DateTime<Utc>>,
    /// Extraction confidence reported by the extraction collaborator.
    pub extraction_confidence: Option<f64>,
}

impl Invoice {
    /// Find a line item by description (case-insensitive).
    pub fn line_item_by_description(&self, description: &str) -> Option<&InvoiceLineItem> {
        let needle = description.to_lowercase();
        self.line_items
            .iter()
            .find(|item| item.description.to_lowercase() == needle)
    }

    /// Total quantity across all line items.
    pub fn total_quantity(&self) -> u32 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

/// Purchase order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoStatus {
    Open,
    Closed,
    Cancelled,
}

impl PoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(status: &str) -> Option<Self> {
        match status {
            "OPEN" => Some(Self::Open),
            "CLOSED" => Some(Self::Closed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A pre-authorized spending commitment against a vendor.
///
/// Mutable over its life (status, line items); queried read-only by the
/// matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique purchase order identifier.
    pub po_number: String,
    /// Name of the vendor/supplier.
    pub vendor_name: String,
    /// Vendor identifier.
    pub vendor_id: Option<String>,
    /// Date the PO was created.
    pub po_date: NaiveDate,
    /// Total authorized amount.
    pub total_authorized: Decimal,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// PO line items, in document order.
    pub line_items: Vec<PoLineItem>,
    /// Reference to a contract.
    pub contract_reference: Option<String>,
    /// Payment terms free text.
    pub payment_terms: Option<String>,
    /// Delivery address.
    pub delivery_address: Option<String>,
    /// Billing address.
    pub billing_address: Option<String>,
    /// Additional notes.
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: PoStatus,
    /// Who approved the PO.
    pub approved_by: Option<String>,
    /// When the PO was approved.
    pub approved_date: Option<DateTime<Utc>>,
    /// When the PO was created in the system.
    pub created_at: Option<DateTime<Utc>>,
    /// When the PO was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    /// Find a line item by description (case-insensitive).
    pub fn line_item_by_description(&self, description: &str) -> Option<&PoLineItem> {
        let needle = description.to_lowercase();
        self.line_items
            .iter()
            .find(|item| item.description.to_lowercase() == needle)
    }

    /// Find a line item by SKU (case-insensitive).
    pub fn line_item_by_sku(&self, sku: &str) -> Option<&PoLineItem> {
        let needle = sku.to_lowercase();
        self.line_items
            .iter()
            .find(|item| item.sku.as_ref().is_some_and(|s| s.to_lowercase() == needle))
    }

    /// Total quantity across all line items.
    pub fn total_quantity(&self) -> u32 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }

    /// Authorized amount remaining after the given invoiced amount.
    pub fn remaining_amount(&self, invoiced_amount: Decimal) -> Decimal {
        self.total_authorized - invoiced_amount
    }

    /// Whether the PO is fully consumed by the given invoiced amount.
    pub fn is_fully_invoiced(&self, invoiced_amount: Decimal) -> bool {
        self.remaining_amount(invoiced_amount) <= Decimal::ZERO
    }
}
