//! Read-only catalog snapshot handed to the planner.

use serde::{Deserialize, Serialize};

use prodplan_core::{DomainResult, MaterialId, ProductId};

/// A raw material with its stock level at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    pub id: MaterialId,
    pub name: String,
    pub stock_quantity: i64,
}

impl RawMaterial {
    pub fn new(id: MaterialId, name: impl Into<String>, stock_quantity: i64) -> Self {
        Self {
            id,
            name: name.into(),
            stock_quantity,
        }
    }
}

/// Quantity of one material needed to produce one unit of a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeItem {
    pub material_id: MaterialId,
    pub required_quantity: i64,
}

impl RecipeItem {
    pub fn new(material_id: MaterialId, required_quantity: i64) -> Self {
        Self {
            material_id,
            required_quantity,
        }
    }
}

/// A finished good with its unit value and resolved recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_value: f64,
    #[serde(default)]
    pub recipe: Vec<RecipeItem>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, unit_value: f64) -> Self {
        Self {
            id,
            name: name.into(),
            unit_value,
            recipe: Vec::new(),
        }
    }

    pub fn with_item(mut self, material_id: MaterialId, required_quantity: i64) -> Self {
        self.recipe.push(RecipeItem::new(material_id, required_quantity));
        self
    }

    /// A product without recipe items can never be planned.
    pub fn has_recipe(&self) -> bool {
        !self.recipe.is_empty()
    }
}

/// Immutable view of the catalog at one point in time.
///
/// `products` keeps the catalog's order; it is the tie-break order for products
/// sharing a unit value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub materials: Vec<RawMaterial>,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>, materials: Vec<RawMaterial>) -> Self {
        Self {
            products,
            materials,
        }
    }
}

/// Source of consistent catalog snapshots.
///
/// Implementations must return a snapshot that is internally consistent (e.g.
/// taken under a read lock or inside a read transaction).
pub trait CatalogProvider: Send + Sync {
    fn snapshot(&self) -> DomainResult<CatalogSnapshot>;
}

impl<P> CatalogProvider for &P
where
    P: CatalogProvider + ?Sized,
{
    fn snapshot(&self) -> DomainResult<CatalogSnapshot> {
        (**self).snapshot()
    }
}

impl<P> CatalogProvider for std::sync::Arc<P>
where
    P: CatalogProvider + ?Sized,
{
    fn snapshot(&self) -> DomainResult<CatalogSnapshot> {
        (**self).snapshot()
    }
}
