//! Plan reporting: material usage and revenue.

use std::collections::BTreeMap;

use prodplan_core::MaterialId;

use crate::ledger::StockLedger;
use crate::plan::{MaterialUsage, ProductionSuggestion};
use crate::snapshot::RawMaterial;

/// Usage of every snapshot material whose stock went down, by ascending id.
pub fn material_usage(materials: &[RawMaterial], ledger: &StockLedger) -> Vec<MaterialUsage> {
    let mut by_id: BTreeMap<MaterialId, &str> = BTreeMap::new();
    for material in materials {
        by_id.entry(material.id).or_insert(material.name.as_str());
    }

    by_id
        .into_iter()
        .filter_map(|(material_id, name)| {
            let used = ledger.used(material_id);
            (used > 0).then(|| MaterialUsage {
                material_id,
                material_name: name.to_string(),
                quantity_used: used,
                remaining_stock: ledger.available(material_id),
            })
        })
        .collect()
}

/// Sum of suggestion values, accumulated in ranking order.
pub fn total_revenue(suggestions: &[ProductionSuggestion]) -> f64 {
    suggestions.iter().fold(0.0, |acc, s| acc + s.total_value)
}
