//! Command implementations.

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use prodplan_catalog::{
    AddRecipeItem, CatalogCommand, CatalogEvent, DeleteRawMaterial, InMemoryCatalogStore,
    UpdateRawMaterial, read_seed, write_seed,
};
use prodplan_core::{DomainResult, Event};
use prodplan_planner::{GreedyPlanner, PlanSummary, Product, ProductionPlanResult, RawMaterial};

use crate::cli::{
    CatalogFile, Cli, Command, MaterialCommand, OutputFormat, PlanArgs, ProductCommand,
};
use crate::render;

/// JSON envelope for `prodplan plan --format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub committed: bool,
    pub summary: PlanSummary,
    #[serde(flatten)]
    pub plan: &'a ProductionPlanResult,
}

/// Dispatch a parsed command line, writing command output to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Command::Plan(args) => plan(args, out),
        Command::Material(cmd) => material(cmd, out),
        Command::Product(cmd) => product(cmd, out),
    }
}

fn load_store(file: &CatalogFile) -> anyhow::Result<InMemoryCatalogStore> {
    let catalog = read_seed(&file.catalog)
        .with_context(|| format!("loading catalog from {}", file.catalog.display()))?;
    Ok(InMemoryCatalogStore::from_catalog(catalog))
}

fn save_store(file: &CatalogFile, store: &InMemoryCatalogStore) -> anyhow::Result<()> {
    write_seed(&file.catalog, &store.catalog()?)
        .with_context(|| format!("saving catalog to {}", file.catalog.display()))?;
    Ok(())
}

/// Load the catalog, apply one change, and write it back only if the change was accepted.
fn change_catalog<T>(
    file: &CatalogFile,
    change: impl FnOnce(&InMemoryCatalogStore) -> DomainResult<T>,
) -> anyhow::Result<T> {
    let store = load_store(file)?;
    let value = change(&store).context("catalog rejected the change")?;
    save_store(file, &store)?;
    Ok(value)
}

fn log_events(events: &[CatalogEvent]) {
    for event in events {
        info!(
            event_type = event.event_type(),
            schema_version = event.version(),
            occurred_at = %event.occurred_at(),
            "catalog updated"
        );
    }
}

fn plan(args: &PlanArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let store = load_store(&args.catalog.file)?;
    let plan = GreedyPlanner::new(&store)
        .plan()
        .context("planning production")?;

    let committed = args.commit && !plan.is_empty();
    if committed {
        let events = store
            .commit_plan(&plan)
            .context("committing material usage")?;
        save_store(&args.catalog.file, &store)?;
        log_events(&events);
    }

    match args.catalog.format {
        OutputFormat::Json => {
            let report = PlanReport {
                generated_at: Utc::now(),
                committed,
                summary: plan.summary(),
                plan: &plan,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => render::plan(out, &plan, committed)?,
    }
    Ok(())
}

fn material(cmd: &MaterialCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match cmd {
        MaterialCommand::List(args) => {
            let store = load_store(&args.file)?;
            let materials: Vec<RawMaterial> =
                store.with_catalog(|c| c.materials().cloned().collect())?;
            match args.format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &materials)?;
                    writeln!(out)?;
                }
                OutputFormat::Text => render::materials(out, &materials)?,
            }
        }
        MaterialCommand::Add { file, name, stock } => {
            let id = change_catalog(file, |store| store.create_raw_material(name.as_str(), *stock))?;
            info!(material_id = %id, "raw material created");
            writeln!(out, "Created raw material {id} ({name}).")?;
        }
        MaterialCommand::Update {
            file,
            id,
            name,
            stock,
        } => {
            let events = change_catalog(file, |store| {
                store.execute(CatalogCommand::UpdateRawMaterial(UpdateRawMaterial {
                    material_id: *id,
                    name: name.clone(),
                    stock_quantity: *stock,
                    occurred_at: Utc::now(),
                }))
            })?;
            log_events(&events);
            writeln!(out, "Updated raw material {id}.")?;
        }
        MaterialCommand::Delete { file, id } => {
            let events = change_catalog(file, |store| {
                store.execute(CatalogCommand::DeleteRawMaterial(DeleteRawMaterial {
                    material_id: *id,
                    occurred_at: Utc::now(),
                }))
            })?;
            log_events(&events);
            writeln!(out, "Deleted raw material {id}.")?;
        }
    }
    Ok(())
}

fn product(cmd: &ProductCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match cmd {
        ProductCommand::List(args) => {
            let store = load_store(&args.file)?;
            let (products, materials): (Vec<Product>, Vec<RawMaterial>) = store
                .with_catalog(|c| (c.products().to_vec(), c.materials().cloned().collect()))?;
            match args.format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &products)?;
                    writeln!(out)?;
                }
                OutputFormat::Text => render::products(out, &products, &materials)?,
            }
        }
        ProductCommand::Add { file, name, value } => {
            let id = change_catalog(file, |store| store.create_product(name.as_str(), *value))?;
            info!(product_id = %id, "product created");
            writeln!(out, "Created product {id} ({name}).")?;
        }
        ProductCommand::Link {
            file,
            id,
            material,
            quantity,
        } => {
            let events = change_catalog(file, |store| {
                store.execute(CatalogCommand::AddRecipeItem(AddRecipeItem {
                    product_id: *id,
                    material_id: *material,
                    required_quantity: *quantity,
                    occurred_at: Utc::now(),
                }))
            })?;
            log_events(&events);
            writeln!(
                out,
                "Product {id} now needs {quantity} of material {material} per unit."
            )?;
        }
    }
    Ok(())
}
