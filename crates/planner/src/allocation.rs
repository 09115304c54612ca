//! Greedy allocation loop.

use std::collections::BTreeMap;

use prodplan_core::MaterialId;
use tracing::{debug, warn};

use crate::ledger::StockLedger;
use crate::plan::ProductionSuggestion;
use crate::snapshot::Product;

/// Commit the maximum producible quantity of each product, in the given order.
///
/// Products that cannot be produced at all (empty recipe, scarce stock, bad
/// recipe data) are skipped without consuming anything.
pub fn allocate(ranked: &[&Product], ledger: &mut StockLedger) -> Vec<ProductionSuggestion> {
    let mut suggestions = Vec::new();

    for product in ranked {
        let Some(requirements) = unit_requirements(product) else {
            continue;
        };

        let quantity = max_for_requirements(&requirements, ledger);
        if quantity == 0 {
            debug!(product = %product.name, "insufficient stock; skipping");
            continue;
        }

        for (&material_id, &per_unit) in &requirements {
            // floor(available / per_unit) * per_unit <= available, so this cannot overdraw.
            ledger.consume(material_id, per_unit * quantity);
        }

        debug!(product = %product.name, quantity, "allocated");
        suggestions.push(ProductionSuggestion::new(product, quantity));
    }

    suggestions
}

/// Largest quantity of `product` the ledger can currently cover.
///
/// Returns 0 for products without a recipe or with a non-positive requirement.
pub fn max_producible(product: &Product, ledger: &StockLedger) -> i64 {
    unit_requirements(product)
        .map(|requirements| max_for_requirements(&requirements, ledger))
        .unwrap_or(0)
}

/// Per-unit requirement per material, or `None` if the product must be skipped.
///
/// Repeated materials are summed so one product can never draw the same stock twice.
fn unit_requirements(product: &Product) -> Option<BTreeMap<MaterialId, i64>> {
    if !product.has_recipe() {
        debug!(product = %product.name, "no recipe; skipping");
        return None;
    }

    let mut requirements: BTreeMap<MaterialId, i64> = BTreeMap::new();
    for item in &product.recipe {
        if item.required_quantity <= 0 {
            warn!(
                product = %product.name,
                material_id = %item.material_id,
                required_quantity = item.required_quantity,
                "non-positive recipe requirement; treating product as unproducible"
            );
            return None;
        }
        let entry = requirements.entry(item.material_id).or_insert(0);
        *entry = entry.checked_add(item.required_quantity)?;
    }

    Some(requirements)
}

fn max_for_requirements(requirements: &BTreeMap<MaterialId, i64>, ledger: &StockLedger) -> i64 {
    requirements
        .iter()
        .map(|(&material_id, &per_unit)| ledger.available(material_id).div_euclid(per_unit))
        .min()
        .unwrap_or(0)
        .max(0)
}
