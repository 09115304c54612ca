//! Catalog domain module.
//!
//! Owns products, raw materials and recipes, and validates every write
//! (unknown ids, duplicate recipe links, non-positive quantities) before a
//! snapshot ever reaches the planner. Business rules are deterministic domain
//! logic; the in-memory store is the only stateful piece.

pub mod catalog;
pub mod seed;
pub mod store;

pub use catalog::{
    AddRecipeItem, Catalog, CatalogCommand, CatalogEvent, ConsumeMaterial, CreateProduct,
    CreateRawMaterial, DeleteRawMaterial, MaterialConsumed, MaterialCreated, MaterialDeleted,
    MaterialUpdated, ProductCreated, RecipeItemAdded, UpdateRawMaterial,
};
pub use seed::{SeedError, parse_seed, read_seed, write_seed};
pub use store::InMemoryCatalogStore;
