use std::collections::BTreeMap;

use crate::core::{PurchaseOrder, ReconcileError};

/// Purchase order lookup capability consumed by the matcher.
///
/// Implementations may be backed by anything from an in-memory map to a
/// persistent store; failures surface as [`ReconcileError::Lookup`] and are
/// treated by the matcher as "strategy failed, try next".
pub trait PoLookup {
    /// Look up a purchase order by its exact number.
    fn by_number(&self, po_number: &str) -> Result<Option<PurchaseOrder>, ReconcileError>;

    /// All purchase orders whose vendor name matches (case-insensitive).
    fn by_vendor(&self, vendor_name: &str) -> Result<Vec<PurchaseOrder>, ReconcileError>;

    /// All purchase orders.
    fn all(&self) -> Result<Vec<PurchaseOrder>, ReconcileError>;
}

impl<L: PoLookup + ?Sized> PoLookup for &L {
    fn by_number(&self, po_number: &str) -> Result<Option<PurchaseOrder>, ReconcileError> {
        (**self).by_number(po_number)
    }

    fn by_vendor(&self, vendor_name: &str) -> Result<Vec<PurchaseOrder>, ReconcileError> {
        (**self).by_vendor(vendor_name)
    }

    fn all(&self) -> Result<Vec<PurchaseOrder>, ReconcileError> {
        (**self).all()
    }
}

/// In-memory purchase order store keyed by PO number.
///
/// Enumeration order is po_number ascending, so cascade strategies that take
/// the first acceptable candidate behave deterministically.
#[derive(Debug, Clone, Default)]
pub struct MemoryPoStore {
    orders: BTreeMap<String, PurchaseOrder>,
}

impl MemoryPoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a purchase order, replacing any existing entry with the same
    /// number. Returns the replaced order, if any.
    pub fn insert(&mut self, po: PurchaseOrder) -> Option<PurchaseOrder> {
        self.orders.insert(po.po_number.clone(), po)
    }

    /// Remove a purchase order by number.
    pub fn remove(&mut self, po_number: &str) -> Option<PurchaseOrder> {
        self.orders.remove(po_number)
    }

    pub fn get(&self, po_number: &str) -> Option<&PurchaseOrder> {
        self.orders.get(po_number)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl PoLookup for MemoryPoStore {
    fn by_number(&self, po_number: &str) -> Result<Option<PurchaseOrder>, ReconcileError> {
        Ok(self.orders.get(po_number).cloned())
    }

    fn by_vendor(&self, vendor_name: &str) -> Result<Vec<PurchaseOrder>, ReconcileError> {
        let needle = vendor_name.to_lowercase();
        Ok(self
            .orders
            .values()
            .filter(|po| po.vendor_name.to_lowercase() == needle)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<PurchaseOrder>, ReconcileError> {
        Ok(self.orders.values().cloned().collect())
    }
}
