//! Per-invocation stock ledger.

use std::collections::BTreeMap;

use prodplan_core::MaterialId;

use crate::snapshot::RawMaterial;

/// Remaining quantity per raw material during one planning run.
///
/// The ledger is a plain store: it does not check that a consumption fits the
/// available stock. Callers must never consume more than [`StockLedger::available`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StockLedger {
    initial: BTreeMap<MaterialId, i64>,
    current: BTreeMap<MaterialId, i64>,
}

impl StockLedger {
    /// Seed the ledger from snapshot materials. The first entry wins if an id repeats.
    pub fn init<'a, I>(materials: I) -> Self
    where
        I: IntoIterator<Item = &'a RawMaterial>,
    {
        let mut initial = BTreeMap::new();
        for material in materials {
            initial.entry(material.id).or_insert(material.stock_quantity);
        }
        let current = initial.clone();
        Self { initial, current }
    }

    /// Current quantity, 0 for unknown materials.
    pub fn available(&self, material_id: MaterialId) -> i64 {
        self.current.get(&material_id).copied().unwrap_or(0)
    }

    /// Quantity at seeding time, 0 for unknown materials.
    pub fn initial(&self, material_id: MaterialId) -> i64 {
        self.initial.get(&material_id).copied().unwrap_or(0)
    }

    /// Take `amount` out of stock. The caller guarantees `amount <= available(material_id)`.
    pub fn consume(&mut self, material_id: MaterialId, amount: i64) {
        debug_assert!(
            amount <= self.available(material_id),
            "consuming {amount} of material {material_id} exceeds available stock"
        );
        *self.current.entry(material_id).or_insert(0) -= amount;
    }

    /// How much of a material has been consumed since seeding.
    pub fn used(&self, material_id: MaterialId) -> i64 {
        self.initial(material_id) - self.available(material_id)
    }

    /// Materials known to the ledger, in ascending id order.
    pub fn material_ids(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.initial.keys().copied()
    }
}
