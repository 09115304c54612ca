//! In-memory catalog store.
//!
//! Serializes writes behind a `RwLock` and hands out detached snapshots, so a
//! planning run never observes a half-applied command.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, warn};

use prodplan_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Event, MaterialId, ProductId};
use prodplan_planner::{CatalogProvider, CatalogSnapshot, ProductionPlanResult};

use crate::catalog::{
    Catalog, CatalogCommand, CatalogEvent, ConsumeMaterial, CreateProduct, CreateRawMaterial,
};

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Catalog>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            inner: RwLock::new(catalog),
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Catalog>> {
        self.inner
            .read()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Catalog>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))
    }

    /// Validate and apply a command atomically.
    pub fn execute(&self, command: CatalogCommand) -> DomainResult<Vec<CatalogEvent>> {
        let mut catalog = self.write()?;
        execute_locked(&mut catalog, &command)
    }

    /// Create a raw material under the next free id.
    pub fn create_raw_material(
        &self,
        name: impl Into<String>,
        stock_quantity: i64,
    ) -> DomainResult<MaterialId> {
        let mut catalog = self.write()?;
        let material_id = catalog.next_material_id()?;
        execute_locked(
            &mut catalog,
            &CatalogCommand::CreateRawMaterial(CreateRawMaterial {
                material_id,
                name: name.into(),
                stock_quantity,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(material_id)
    }

    /// Create a product under the next free id.
    pub fn create_product(&self, name: impl Into<String>, unit_value: f64) -> DomainResult<ProductId> {
        let mut catalog = self.write()?;
        let product_id = catalog.next_product_id()?;
        execute_locked(
            &mut catalog,
            &CatalogCommand::CreateProduct(CreateProduct {
                product_id,
                name: name.into(),
                unit_value,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(product_id)
    }

    /// Deduct a plan's material usage from stock, all or nothing.
    pub fn commit_plan(&self, plan: &ProductionPlanResult) -> DomainResult<Vec<CatalogEvent>> {
        let mut catalog = self.write()?;
        let mut staged = catalog.clone();
        let occurred_at = Utc::now();

        let mut events = Vec::with_capacity(plan.material_usage.len());
        for usage in &plan.material_usage {
            let command = CatalogCommand::ConsumeMaterial(ConsumeMaterial {
                material_id: usage.material_id,
                quantity: usage.quantity_used,
                occurred_at,
            });
            events.extend(execute_locked(&mut staged, &command)?);
        }

        *catalog = staged;
        Ok(events)
    }

    /// Run a read-only closure against the current catalog.
    pub fn with_catalog<R>(&self, f: impl FnOnce(&Catalog) -> R) -> DomainResult<R> {
        let catalog = self.read()?;
        Ok(f(&catalog))
    }

    /// Detached copy of the current catalog state.
    pub fn catalog(&self) -> DomainResult<Catalog> {
        self.with_catalog(Catalog::clone)
    }
}

fn execute_locked(
    catalog: &mut Catalog,
    command: &CatalogCommand,
) -> DomainResult<Vec<CatalogEvent>> {
    let events = catalog.handle(command).inspect_err(|err| {
        warn!(error = %err, "catalog command rejected");
    })?;

    for event in &events {
        catalog.apply(event);
        debug!(
            event_type = event.event_type(),
            schema_version = event.version(),
            occurred_at = %event.occurred_at(),
            catalog_version = catalog.version(),
            "catalog event applied"
        );
    }

    Ok(events)
}

impl CatalogProvider for InMemoryCatalogStore {
    fn snapshot(&self) -> DomainResult<CatalogSnapshot> {
        Ok(self.read()?.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AddRecipeItem;
    use prodplan_planner::GreedyPlanner;
    use std::sync::Arc;

    fn furniture_store(wood: i64) -> (InMemoryCatalogStore, MaterialId) {
        let store = InMemoryCatalogStore::new();
        let wood_id = store.create_raw_material("Wood", wood).unwrap();
        let table = store.create_product("Table", 50.0).unwrap();
        let chair = store.create_product("Chair", 20.0).unwrap();
        for (product_id, quantity) in [(table, 10), (chair, 4)] {
            store
                .execute(CatalogCommand::AddRecipeItem(AddRecipeItem {
                    product_id,
                    material_id: wood_id,
                    required_quantity: quantity,
                    occurred_at: Utc::now(),
                }))
                .unwrap();
        }
        (store, wood_id)
    }

    #[test]
    fn assigns_sequential_ids() {
        let store = InMemoryCatalogStore::new();
        assert_eq!(store.create_raw_material("Wood", 1).unwrap(), MaterialId::new(1));
        assert_eq!(store.create_raw_material("Steel", 1).unwrap(), MaterialId::new(2));
        assert_eq!(store.create_product("Table", 1.0).unwrap(), ProductId::new(1));
    }

    #[test]
    fn create_after_last_possible_id_is_rejected() {
        let seed = format!(
            r#"{{ "materials": [{{ "id": {max}, "name": "Wood", "stockQuantity": 1 }}],
                 "products": [{{ "id": {max}, "name": "Table", "unitValue": 1.0 }}] }}"#,
            max = u64::MAX
        );
        let store = InMemoryCatalogStore::from_catalog(crate::seed::parse_seed(&seed).unwrap());

        let err = store.create_raw_material("Steel", 1).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("exhausted")));
        let err = store.create_product("Chair", 1.0).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(store.with_catalog(|c| c.materials().count()).unwrap(), 1);
    }

    #[test]
    fn rejected_command_surfaces_domain_error() {
        let store = InMemoryCatalogStore::new();
        let err = store.create_raw_material("", 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.with_catalog(|c| c.materials().count()).unwrap(), 0);
    }

    #[test]
    fn snapshot_feeds_the_planner() {
        let (store, _) = furniture_store(105);
        let planner = GreedyPlanner::new(Arc::new(store));
        let plan = planner.plan().unwrap();

        assert_eq!(plan.suggestions.len(), 2);
        assert_eq!(plan.total_revenue, 520.0);
    }

    #[test]
    fn commit_plan_deducts_usage() {
        let (store, wood_id) = furniture_store(105);
        let plan = GreedyPlanner::new(&store).plan().unwrap();

        let events = store.commit_plan(&plan).unwrap();
        assert_eq!(events.len(), 1);

        let stock = store
            .with_catalog(|c| c.material(wood_id).map(|m| m.stock_quantity))
            .unwrap();
        assert_eq!(stock, Some(1));

        // a second plan over the remaining stock produces nothing
        let replanned = GreedyPlanner::new(&store).plan().unwrap();
        assert!(replanned.is_empty());
    }

    #[test]
    fn commit_plan_is_all_or_nothing() {
        let (store, wood_id) = furniture_store(100);
        let plan = GreedyPlanner::new(&store).plan().unwrap();

        // stock changed since planning: the stale plan overdraws
        store
            .execute(CatalogCommand::ConsumeMaterial(ConsumeMaterial {
                material_id: wood_id,
                quantity: 50,
                occurred_at: Utc::now(),
            }))
            .unwrap();

        let before = store.catalog().unwrap();
        assert!(matches!(store.commit_plan(&plan), Err(DomainError::Conflict(_))));
        assert_eq!(store.catalog().unwrap(), before);
    }
}
