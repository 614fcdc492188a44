use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::error::ReconcileError;
use super::types::*;
use super::validation;

/// Builder for constructing valid invoices.
///
/// ```
/// use apmatch::core::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let invoice = InvoiceBuilder::new(
///     "INV-2024-001",
///     "ABC Supplies Inc.",
///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
/// )
/// .amounts(dec!(2750.00), dec!(250.00), dec!(2500.00))
/// .add_line(InvoiceLineItem::new("Office Chairs", 10, dec!(150.00), dec!(1500.00)).unwrap())
/// .add_line(InvoiceLineItem::new("Desk Lamps", 20, dec!(50.00), dec!(1000.00)).unwrap())
/// .po_reference("PO-2024-001")
/// .build()
/// .unwrap();
///
/// assert_eq!(invoice.total_quantity(), 30);
/// ```
pub struct InvoiceBuilder {
    invoice_number: String,
    vendor_name: String,
    vendor_id: Option<String>,
    invoice_date: NaiveDate,
    due_date: NaiveDate,
    total_amount: Decimal,
    tax_amount: Decimal,
    subtotal_amount: Decimal,
    currency: String,
    line_items: Vec<InvoiceLineItem>,
    po_reference: Option<String>,
    contract_reference: Option<String>,
    payment_terms: Option<String>,
    shipping_address: Option<String>,
    billing_address: Option<String>,
    notes: Option<String>,
    file_path: Option<String>,
    extracted_at: Option<DateTime<Utc>>,
    extraction_confidence: Option<f64>,
}

impl InvoiceBuilder {
    pub fn new(
        invoice_number: impl Into<String>,
        vendor_name: impl Into<String>,
        invoice_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            vendor_name: vendor_name.into(),
            vendor_id: None,
            invoice_date,
            due_date,
            total_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            subtotal_amount: Decimal::ZERO,
            currency: "USD".to_string(),
            line_items: Vec::new(),
            po_reference: None,
            contract_reference: None,
            payment_terms: None,
            shipping_address: None,
            billing_address: None,
            notes: None,
            file_path: None,
            extracted_at: None,
            extraction_confidence: None,
        }
    }

    /// Set total, tax, and subtotal amounts together; `build` enforces
    /// `total == subtotal + tax` and `subtotal == Σ line totals`.
    pub fn amounts(mut self, total: Decimal, tax: Decimal, subtotal: Decimal) -> Self {
        self.total_amount = total;
        self.tax_amount = tax;
        self.subtotal_amount = subtotal;
        self
    }

    pub fn vendor_id(mut self, id: impl Into<String>) -> Self {
        self.vendor_id = Some(id.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn add_line(mut self, line: InvoiceLineItem) -> Self {
        self.line_items.push(line);
        self
    }

    pub fn po_reference(mut self, reference: impl Into<String>) -> Self {
        self.po_reference = Some(reference.into());
        self
    }

    pub fn contract_reference(mut self, reference: impl Into<String>) -> Self {
        self.contract_reference = Some(reference.into());
        self
    }

    pub fn payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.payment_terms = Some(terms.into());
        self
    }

    pub fn shipping_address(mut self, address: impl Into<String>) -> Self {
        self.shipping_address = Some(address.into());
        self
    }

    pub fn billing_address(mut self, address: impl Into<String>) -> Self {
        self.billing_address = Some(address.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn extracted_at(mut self, at: DateTime<Utc>) -> Self {
        self.extracted_at = Some(at);
        self
    }

    pub fn extraction_confidence(mut self, confidence: f64) -> Self {
        self.extraction_confidence = Some(confidence);
        self
    }

    /// Build the invoice, running full construction validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice, ReconcileError> {
        // Input limits to prevent abuse
        if self.line_items.len() > 10_000 {
            return Err(ReconcileError::Builder(
                "invoice cannot have more than 10,000 line items".into(),
            ));
        }
        if self.invoice_number.len() > 200 {
            return Err(ReconcileError::Builder(
                "invoice number cannot exceed 200 characters".into(),
            ));
        }

        let invoice = self.assemble();

        let errors = validation::validate_invoice(&invoice);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ReconcileError::Validation(msg));
        }

        Ok(invoice)
    }

    /// Build without validation — useful for importing external data.
    pub fn build_unchecked(self) -> Invoice {
        self.assemble()
    }

    fn assemble(self) -> Invoice {
        Invoice {
            invoice_number: self.invoice_number,
            vendor_name: self.vendor_name,
            vendor_id: self.vendor_id,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            total_amount: self.total_amount,
            tax_amount: self.tax_amount,
            subtotal_amount: self.subtotal_amount,
            currency: self.currency,
            line_items: self.line_items,
            po_reference: self.po_reference,
            contract_reference: self.contract_reference,
            payment_terms: self.payment_terms,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            notes: self.notes,
            file_path: self.file_path,
            extracted_at: self.extracted_at,
            extraction_confidence: self.extraction_confidence,
        }
    }
}

/// Builder for constructing valid purchase orders.
pub struct PurchaseOrderBuilder {
    po_number: String,
    vendor_name: String,
    vendor_id: Option<String>,
    po_date: NaiveDate,
    total_authorized: Decimal,
    currency: String,
    line_items: Vec<PoLineItem>,
    contract_reference: Option<String>,
    payment_terms: Option<String>,
    delivery_address: Option<String>,
    billing_address: Option<String>,
    notes: Option<String>,
    status: PoStatus,
    approved_by: Option<String>,
    approved_date: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl PurchaseOrderBuilder {
    pub fn new(
        po_number: impl Into<String>,
        vendor_name: impl Into<String>,
        po_date: NaiveDate,
    ) -> Self {
        Self {
            po_number: po_number.into(),
            vendor_name: vendor_name.into(),
            vendor_id: None,
            po_date,
            total_authorized: Decimal::ZERO,
            currency: "USD".to_string(),
            line_items: Vec::new(),
            contract_reference: None,
            payment_terms: None,
            delivery_address: None,
            billing_address: None,
            notes: None,
            status: PoStatus::Open,
            approved_by: None,
            approved_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the authorized amount; `build` enforces it matches Σ line totals.
    pub fn total_authorized(mut self, amount: Decimal) -> Self {
        self.total_authorized = amount;
        self
    }

    pub fn vendor_id(mut self, id: impl Into<String>) -> Self {
        self.vendor_id = Some(id.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn add_line(mut self, line: PoLineItem) -> Self {
        self.line_items.push(line);
        self
    }

    pub fn contract_reference(mut self, reference: impl Into<String>) -> Self {
        self.contract_reference = Some(reference.into());
        self
    }

    pub fn payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.payment_terms = Some(terms.into());
        self
    }

    pub fn delivery_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = Some(address.into());
        self
    }

    pub fn billing_address(mut self, address: impl Into<String>) -> Self {
        self.billing_address = Some(address.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn status(mut self, status: PoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn approval(mut self, by: impl Into<String>, date: DateTime<Utc>) -> Self {
        self.approved_by = Some(by.into());
        self.approved_date = Some(date);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Build the purchase order, running full construction validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<PurchaseOrder, ReconcileError> {
        if self.line_items.len() > 10_000 {
            return Err(ReconcileError::Builder(
                "purchase order cannot have more than 10,000 line items".into(),
            ));
        }
        if self.po_number.len() > 200 {
            return Err(ReconcileError::Builder(
                "PO number cannot exceed 200 characters".into(),
            ));
        }

        let po = self.assemble();

        let errors = validation::validate_purchase_order(&po);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ReconcileError::Validation(msg));
        }

        Ok(po)
    }

    /// Build without validation — useful for importing external data.
    pub fn build_unchecked(self) -> PurchaseOrder {
        self.assemble()
    }

    fn assemble(self) -> PurchaseOrder {
        PurchaseOrder {
            po_number: self.po_number,
            vendor_name: self.vendor_name,
            vendor_id: self.vendor_id,
            po_date: self.po_date,
            total_authorized: self.total_authorized,
            currency: self.currency,
            line_items: self.line_items,
            contract_reference: self.contract_reference,
            payment_terms: self.payment_terms,
            delivery_address: self.delivery_address,
            billing_address: self.billing_address,
            notes: self.notes,
            status: self.status,
            approved_by: self.approved_by,
            approved_date: self.approved_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
