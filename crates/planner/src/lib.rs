//! `prodplan-planner`
//!
//! **Responsibility:** greedy production planning over a catalog snapshot.
//!
//! This crate is pure computation:
//! - It never reads storage; the caller hands it a [`CatalogSnapshot`].
//! - It never mutates the catalog; every invocation owns a private [`StockLedger`].
//! - It never fails; malformed recipe data makes a product unproducible instead.
//!
//! ```text
//! snapshot ──► StockLedger::init ─┐
//!          └─► rank ──────────────┴─► allocate ──► report ──► ProductionPlanResult
//! ```

pub mod allocation;
pub mod ledger;
pub mod plan;
pub mod ranker;
pub mod report;
pub mod snapshot;

pub use allocation::{allocate, max_producible};
pub use ledger::StockLedger;
pub use plan::{
    GreedyPlanner, MaterialUsage, PlanSummary, ProductionPlanResult, ProductionSuggestion,
    plan_production,
};
pub use ranker::rank;
pub use snapshot::{CatalogProvider, CatalogSnapshot, Product, RawMaterial, RecipeItem};
