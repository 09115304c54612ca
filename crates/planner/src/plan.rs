//! Production plan output and the planning entry point.

use serde::{Deserialize, Serialize};
use tracing::info;

use prodplan_core::{DomainResult, MaterialId, ProductId};

use crate::allocation::allocate;
use crate::ledger::StockLedger;
use crate::ranker::rank;
use crate::report::{material_usage, total_revenue};
use crate::snapshot::{CatalogProvider, CatalogSnapshot, Product};

/// How many units of one product to make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSuggestion {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub total_value: f64,
}

impl ProductionSuggestion {
    pub(crate) fn new(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            total_value: quantity as f64 * product.unit_value,
        }
    }
}

/// Stock consumed from one material by the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    pub material_id: MaterialId,
    pub material_name: String,
    pub quantity_used: i64,
    pub remaining_stock: i64,
}

/// Result of one planning run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlanResult {
    /// Suggestions in ranking order.
    pub suggestions: Vec<ProductionSuggestion>,
    /// Consumed materials by ascending material id.
    pub material_usage: Vec<MaterialUsage>,
    pub total_revenue: f64,
}

impl ProductionPlanResult {
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            product_count: self.suggestions.len(),
            total_quantity: self.suggestions.iter().map(|s| s.quantity).sum(),
            total_revenue: self.total_revenue,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Headline figures of a plan (what a production run would yield).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub product_count: usize,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

/// Plan production for a snapshot with a single greedy pass.
///
/// Products are visited by descending unit value; each one gets the largest
/// integer quantity the remaining stock allows. Earlier commitments are never
/// revisited, so the result is not necessarily revenue-optimal.
pub fn plan_production(snapshot: &CatalogSnapshot) -> ProductionPlanResult {
    let mut ledger = StockLedger::init(&snapshot.materials);
    let ranked = rank(&snapshot.products);

    let suggestions = allocate(&ranked, &mut ledger);
    let material_usage = material_usage(&snapshot.materials, &ledger);
    let total_revenue = total_revenue(&suggestions);

    info!(
        products = snapshot.products.len(),
        materials = snapshot.materials.len(),
        suggestions = suggestions.len(),
        total_revenue,
        "production plan computed"
    );

    ProductionPlanResult {
        suggestions,
        material_usage,
        total_revenue,
    }
}

/// Planner bound to a catalog provider.
#[derive(Debug, Clone)]
pub struct GreedyPlanner<P> {
    provider: P,
}

impl<P: CatalogProvider> GreedyPlanner<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Take a fresh snapshot and plan against it.
    pub fn plan(&self) -> DomainResult<ProductionPlanResult> {
        let snapshot = self.provider.snapshot()?;
        Ok(plan_production(&snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::RawMaterial;
    use prodplan_core::DomainError;

    const WOOD: MaterialId = MaterialId::new(1);

    fn furniture(wood: i64) -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![
                Product::new(ProductId::new(1), "Table", 50.0).with_item(WOOD, 10),
                Product::new(ProductId::new(2), "Chair", 20.0).with_item(WOOD, 4),
            ],
            vec![RawMaterial::new(WOOD, "Wood", wood)],
        )
    }

    #[test]
    fn summary_counts_units_and_products() {
        let plan = plan_production(&furniture(105));
        let summary = plan.summary();
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.total_quantity, 11);
        assert_eq!(summary.total_revenue, 520.0);
    }

    #[test]
    fn empty_snapshot_yields_empty_plan() {
        let plan = plan_production(&CatalogSnapshot::default());
        assert!(plan.is_empty());
        assert!(plan.material_usage.is_empty());
        assert_eq!(plan.total_revenue, 0.0);
    }

    #[test]
    fn snapshot_is_not_mutated() {
        let snapshot = furniture(100);
        let before = snapshot.clone();
        let _ = plan_production(&snapshot);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let plan = plan_production(&furniture(100));
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["suggestions"][0]["productName"], "Table");
        assert_eq!(json["suggestions"][0]["totalValue"], 500.0);
        assert_eq!(json["materialUsage"][0]["quantityUsed"], 100);
        assert_eq!(json["materialUsage"][0]["remainingStock"], 0);
        assert_eq!(json["totalRevenue"], 500.0);
    }

    struct FixedProvider(CatalogSnapshot);

    impl CatalogProvider for FixedProvider {
        fn snapshot(&self) -> DomainResult<CatalogSnapshot> {
            Ok(self.0.clone())
        }
    }

    struct BrokenProvider;

    impl CatalogProvider for BrokenProvider {
        fn snapshot(&self) -> DomainResult<CatalogSnapshot> {
            Err(DomainError::invariant("catalog lock poisoned"))
        }
    }

    #[test]
    fn planner_plans_against_provider_snapshot() {
        let planner = GreedyPlanner::new(FixedProvider(furniture(100)));
        let plan = planner.plan().unwrap();
        assert_eq!(plan.total_revenue, 500.0);
    }

    #[test]
    fn planner_propagates_provider_errors() {
        let planner = GreedyPlanner::new(BrokenProvider);
        assert!(matches!(
            planner.plan(),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use crate::allocation::max_producible;
        use proptest::prelude::*;

        fn arb_snapshot() -> impl Strategy<Value = CatalogSnapshot> {
            let materials = prop::collection::vec(0i64..500, 1..6);
            let products = prop::collection::vec(
                (
                    0u32..200,
                    prop::collection::vec((0u64..7, 0i64..30), 0..4),
                ),
                0..8,
            );
            (materials, products).prop_map(|(stocks, products)| {
                let materials = stocks
                    .into_iter()
                    .enumerate()
                    .map(|(i, stock)| {
                        RawMaterial::new(MaterialId::new(i as u64), format!("M{i}"), stock)
                    })
                    .collect();
                let products = products
                    .into_iter()
                    .enumerate()
                    .map(|(i, (value, recipe))| {
                        let mut product =
                            Product::new(ProductId::new(i as u64), format!("P{i}"), value as f64 / 4.0);
                        let mut seen = std::collections::BTreeSet::new();
                        for (material, quantity) in recipe {
                            if seen.insert(material) {
                                product = product.with_item(MaterialId::new(material), quantity);
                            }
                        }
                        product
                    })
                    .collect();
                CatalogSnapshot::new(products, materials)
            })
        }

        fn find<'a>(snapshot: &'a CatalogSnapshot, id: ProductId) -> &'a Product {
            snapshot.products.iter().find(|p| p.id == id).unwrap()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: consumed stock equals the sum of allocated recipe requirements.
            #[test]
            fn conservation(snapshot in arb_snapshot()) {
                let plan = plan_production(&snapshot);
                for material in &snapshot.materials {
                    let expected: i64 = plan
                        .suggestions
                        .iter()
                        .map(|s| {
                            let product = find(&snapshot, s.product_id);
                            product
                                .recipe
                                .iter()
                                .filter(|item| item.material_id == material.id)
                                .map(|item| item.required_quantity * s.quantity)
                                .sum::<i64>()
                        })
                        .sum();
                    let used = plan
                        .material_usage
                        .iter()
                        .find(|u| u.material_id == material.id)
                        .map(|u| u.quantity_used)
                        .unwrap_or(0);
                    prop_assert_eq!(used, expected);
                }
            }

            /// Property: remaining stock never goes negative.
            #[test]
            fn non_negativity(snapshot in arb_snapshot()) {
                let plan = plan_production(&snapshot);
                for usage in &plan.material_usage {
                    prop_assert!(usage.remaining_stock >= 0);
                    prop_assert!(usage.quantity_used > 0);
                }
            }

            /// Property: each suggestion is priced at quantity × unit value, and the
            /// quantity is what the product could make when its turn came.
            #[test]
            fn revenue_consistency(snapshot in arb_snapshot()) {
                let plan = plan_production(&snapshot);
                let mut ledger = StockLedger::init(&snapshot.materials);
                let mut expected_revenue = 0.0;

                for product in rank(&snapshot.products) {
                    let quantity = max_producible(product, &ledger);
                    let suggestion = plan.suggestions.iter().find(|s| s.product_id == product.id);
                    if quantity == 0 {
                        prop_assert!(suggestion.is_none());
                        continue;
                    }
                    let suggestion = suggestion.unwrap();
                    prop_assert_eq!(suggestion.quantity, quantity);
                    prop_assert_eq!(suggestion.total_value, quantity as f64 * product.unit_value);

                    for item in &product.recipe {
                        ledger.consume(item.material_id, item.required_quantity * quantity);
                    }
                    expected_revenue += quantity as f64 * product.unit_value;
                }

                prop_assert_eq!(plan.total_revenue, expected_revenue);
            }

            /// Property: unproducible products never show up.
            #[test]
            fn exclusion(snapshot in arb_snapshot()) {
                let plan = plan_production(&snapshot);
                for suggestion in &plan.suggestions {
                    let product = find(&snapshot, suggestion.product_id);
                    prop_assert!(product.has_recipe());
                    prop_assert!(product.recipe.iter().all(|item| item.required_quantity > 0));
                    prop_assert!(suggestion.quantity > 0);
                }
            }

            /// Property: planning is deterministic (same snapshot = same plan).
            #[test]
            fn determinism(snapshot in arb_snapshot()) {
                prop_assert_eq!(plan_production(&snapshot), plan_production(&snapshot));
            }
        }
    }
}
