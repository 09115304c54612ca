use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prodplan_core::{Aggregate, AggregateRoot, DomainError, Event, MaterialId, ProductId};
use prodplan_planner::{CatalogSnapshot, Product, RawMaterial, RecipeItem};

/// Aggregate root: the product/material catalog.
///
/// Products keep their creation order; that order is the planner's tie-break
/// order for products with equal unit values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    materials: BTreeMap<MaterialId, RawMaterial>,
    products: Vec<Product>,
    last_material_id: Option<MaterialId>,
    last_product_id: Option<ProductId>,
    version: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material(&self, material_id: MaterialId) -> Option<&RawMaterial> {
        self.materials.get(&material_id)
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Materials by ascending id.
    pub fn materials(&self) -> impl Iterator<Item = &RawMaterial> {
        self.materials.values()
    }

    /// Products in creation order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Next unused material id. Ids are never reused, even after deletion.
    pub fn next_material_id(&self) -> Result<MaterialId, DomainError> {
        match self.last_material_id {
            None => Ok(MaterialId::new(1)),
            Some(id) => id
                .checked_next()
                .ok_or_else(|| DomainError::conflict("raw material id space exhausted")),
        }
    }

    /// Next unused product id.
    pub fn next_product_id(&self) -> Result<ProductId, DomainError> {
        match self.last_product_id {
            None => Ok(ProductId::new(1)),
            Some(id) => id
                .checked_next()
                .ok_or_else(|| DomainError::conflict("product id space exhausted")),
        }
    }

    /// Consistent, detached copy of the catalog for planning.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot::new(
            self.products.clone(),
            self.materials.values().cloned().collect(),
        )
    }

    /// Rebuild a catalog from a snapshot by replaying it as commands.
    ///
    /// Every entry goes through the same validation as an interactive write.
    pub fn from_snapshot(
        snapshot: &CatalogSnapshot,
        occurred_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut catalog = Catalog::new();

        for material in &snapshot.materials {
            catalog.execute(&CatalogCommand::CreateRawMaterial(CreateRawMaterial {
                material_id: material.id,
                name: material.name.clone(),
                stock_quantity: material.stock_quantity,
                occurred_at,
            }))?;
        }

        for product in &snapshot.products {
            catalog.execute(&CatalogCommand::CreateProduct(CreateProduct {
                product_id: product.id,
                name: product.name.clone(),
                unit_value: product.unit_value,
                occurred_at,
            }))?;
            for item in &product.recipe {
                catalog.execute(&CatalogCommand::AddRecipeItem(AddRecipeItem {
                    product_id: product.id,
                    material_id: item.material_id,
                    required_quantity: item.required_quantity,
                    occurred_at,
                }))?;
            }
        }

        Ok(catalog)
    }

    /// Handle a command and apply the resulting events.
    pub fn execute(&mut self, command: &CatalogCommand) -> Result<Vec<CatalogEvent>, DomainError> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}

impl AggregateRoot for Catalog {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateRawMaterial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRawMaterial {
    pub material_id: MaterialId,
    pub name: String,
    pub stock_quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateRawMaterial (replaces name and stock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRawMaterial {
    pub material_id: MaterialId,
    pub name: String,
    pub stock_quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteRawMaterial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRawMaterial {
    pub material_id: MaterialId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub name: String,
    pub unit_value: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddRecipeItem (link a material into a product's recipe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRecipeItem {
    pub product_id: ProductId,
    pub material_id: MaterialId,
    pub required_quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConsumeMaterial (commit planned usage to stock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeMaterial {
    pub material_id: MaterialId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogCommand {
    CreateRawMaterial(CreateRawMaterial),
    UpdateRawMaterial(UpdateRawMaterial),
    DeleteRawMaterial(DeleteRawMaterial),
    CreateProduct(CreateProduct),
    AddRecipeItem(AddRecipeItem),
    ConsumeMaterial(ConsumeMaterial),
}

/// Event: MaterialCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCreated {
    pub material_id: MaterialId,
    pub name: String,
    pub stock_quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MaterialUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialUpdated {
    pub material_id: MaterialId,
    pub name: String,
    pub stock_quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MaterialDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDeleted {
    pub material_id: MaterialId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub name: String,
    pub unit_value: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RecipeItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeItemAdded {
    pub product_id: ProductId,
    pub material_id: MaterialId,
    pub required_quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MaterialConsumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialConsumed {
    pub material_id: MaterialId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogEvent {
    MaterialCreated(MaterialCreated),
    MaterialUpdated(MaterialUpdated),
    MaterialDeleted(MaterialDeleted),
    ProductCreated(ProductCreated),
    RecipeItemAdded(RecipeItemAdded),
    MaterialConsumed(MaterialConsumed),
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::MaterialCreated(_) => "catalog.material.created",
            CatalogEvent::MaterialUpdated(_) => "catalog.material.updated",
            CatalogEvent::MaterialDeleted(_) => "catalog.material.deleted",
            CatalogEvent::ProductCreated(_) => "catalog.product.created",
            CatalogEvent::RecipeItemAdded(_) => "catalog.recipe.item_added",
            CatalogEvent::MaterialConsumed(_) => "catalog.material.consumed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::MaterialCreated(e) => e.occurred_at,
            CatalogEvent::MaterialUpdated(e) => e.occurred_at,
            CatalogEvent::MaterialDeleted(e) => e.occurred_at,
            CatalogEvent::ProductCreated(e) => e.occurred_at,
            CatalogEvent::RecipeItemAdded(e) => e.occurred_at,
            CatalogEvent::MaterialConsumed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Catalog {
    type Command = CatalogCommand;
    type Event = CatalogEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CatalogEvent::MaterialCreated(e) => {
                self.materials.insert(
                    e.material_id,
                    RawMaterial::new(e.material_id, e.name.clone(), e.stock_quantity),
                );
                self.last_material_id = self.last_material_id.max(Some(e.material_id));
            }
            CatalogEvent::MaterialUpdated(e) => {
                if let Some(material) = self.materials.get_mut(&e.material_id) {
                    material.name = e.name.clone();
                    material.stock_quantity = e.stock_quantity;
                }
            }
            CatalogEvent::MaterialDeleted(e) => {
                self.materials.remove(&e.material_id);
            }
            CatalogEvent::ProductCreated(e) => {
                self.products
                    .push(Product::new(e.product_id, e.name.clone(), e.unit_value));
                self.last_product_id = self.last_product_id.max(Some(e.product_id));
            }
            CatalogEvent::RecipeItemAdded(e) => {
                if let Some(product) = self.products.iter_mut().find(|p| p.id == e.product_id) {
                    product
                        .recipe
                        .push(RecipeItem::new(e.material_id, e.required_quantity));
                }
            }
            CatalogEvent::MaterialConsumed(e) => {
                if let Some(material) = self.materials.get_mut(&e.material_id) {
                    material.stock_quantity -= e.quantity;
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CatalogCommand::CreateRawMaterial(cmd) => self.handle_create_material(cmd),
            CatalogCommand::UpdateRawMaterial(cmd) => self.handle_update_material(cmd),
            CatalogCommand::DeleteRawMaterial(cmd) => self.handle_delete_material(cmd),
            CatalogCommand::CreateProduct(cmd) => self.handle_create_product(cmd),
            CatalogCommand::AddRecipeItem(cmd) => self.handle_add_recipe_item(cmd),
            CatalogCommand::ConsumeMaterial(cmd) => self.handle_consume(cmd),
        }
    }
}

fn ensure_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn ensure_stock(stock_quantity: i64) -> Result<(), DomainError> {
    if stock_quantity < 0 {
        return Err(DomainError::validation(format!(
            "stock quantity cannot be negative (got {stock_quantity})"
        )));
    }
    Ok(())
}

impl Catalog {
    fn existing_material(&self, material_id: MaterialId) -> Result<&RawMaterial, DomainError> {
        self.material(material_id)
            .ok_or_else(|| DomainError::not_found("raw material", material_id))
    }

    fn existing_product(&self, product_id: ProductId) -> Result<&Product, DomainError> {
        self.product(product_id)
            .ok_or_else(|| DomainError::not_found("product", product_id))
    }

    fn handle_create_material(
        &self,
        cmd: &CreateRawMaterial,
    ) -> Result<Vec<CatalogEvent>, DomainError> {
        if self.materials.contains_key(&cmd.material_id) {
            return Err(DomainError::conflict(format!(
                "raw material {} already exists",
                cmd.material_id
            )));
        }
        ensure_name(&cmd.name)?;
        ensure_stock(cmd.stock_quantity)?;

        Ok(vec![CatalogEvent::MaterialCreated(MaterialCreated {
            material_id: cmd.material_id,
            name: cmd.name.clone(),
            stock_quantity: cmd.stock_quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_material(
        &self,
        cmd: &UpdateRawMaterial,
    ) -> Result<Vec<CatalogEvent>, DomainError> {
        self.existing_material(cmd.material_id)?;
        ensure_name(&cmd.name)?;
        ensure_stock(cmd.stock_quantity)?;

        Ok(vec![CatalogEvent::MaterialUpdated(MaterialUpdated {
            material_id: cmd.material_id,
            name: cmd.name.clone(),
            stock_quantity: cmd.stock_quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete_material(
        &self,
        cmd: &DeleteRawMaterial,
    ) -> Result<Vec<CatalogEvent>, DomainError> {
        self.existing_material(cmd.material_id)?;

        let user = self.products.iter().find(|p| {
            p.recipe
                .iter()
                .any(|item| item.material_id == cmd.material_id)
        });
        if let Some(product) = user {
            return Err(DomainError::conflict(format!(
                "raw material {} is used by the recipe of product {} ({})",
                cmd.material_id, product.id, product.name
            )));
        }

        Ok(vec![CatalogEvent::MaterialDeleted(MaterialDeleted {
            material_id: cmd.material_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_create_product(&self, cmd: &CreateProduct) -> Result<Vec<CatalogEvent>, DomainError> {
        if self.product(cmd.product_id).is_some() {
            return Err(DomainError::conflict(format!(
                "product {} already exists",
                cmd.product_id
            )));
        }
        ensure_name(&cmd.name)?;
        if !cmd.unit_value.is_finite() || cmd.unit_value < 0.0 {
            return Err(DomainError::validation(format!(
                "unit value must be a finite, non-negative number (got {})",
                cmd.unit_value
            )));
        }

        Ok(vec![CatalogEvent::ProductCreated(ProductCreated {
            product_id: cmd.product_id,
            name: cmd.name.clone(),
            unit_value: cmd.unit_value,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_recipe_item(
        &self,
        cmd: &AddRecipeItem,
    ) -> Result<Vec<CatalogEvent>, DomainError> {
        let product = self.existing_product(cmd.product_id)?;
        self.existing_material(cmd.material_id)?;

        if cmd.required_quantity <= 0 {
            return Err(DomainError::InvalidRequiredQuantity(cmd.required_quantity));
        }

        if product
            .recipe
            .iter()
            .any(|item| item.material_id == cmd.material_id)
        {
            return Err(DomainError::duplicate_recipe_link(
                cmd.product_id,
                cmd.material_id,
            ));
        }

        Ok(vec![CatalogEvent::RecipeItemAdded(RecipeItemAdded {
            product_id: cmd.product_id,
            material_id: cmd.material_id,
            required_quantity: cmd.required_quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_consume(&self, cmd: &ConsumeMaterial) -> Result<Vec<CatalogEvent>, DomainError> {
        let material = self.existing_material(cmd.material_id)?;

        if cmd.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "consumed quantity must be positive (got {})",
                cmd.quantity
            )));
        }

        if cmd.quantity > material.stock_quantity {
            return Err(DomainError::conflict(format!(
                "insufficient stock for raw material {}: requested {}, available {}",
                cmd.material_id, cmd.quantity, material.stock_quantity
            )));
        }

        Ok(vec![CatalogEvent::MaterialConsumed(MaterialConsumed {
            material_id: cmd.material_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }
}
