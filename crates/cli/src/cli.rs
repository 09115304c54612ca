//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use prodplan_core::{MaterialId, ProductId};
use prodplan_observability::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "prodplan", version, about = "Greedy production planning over raw-material stock")]
pub struct Cli {
    /// Log output format (pretty, json)
    #[arg(long, global = true, env = "PRODPLAN_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute the production plan for the current stock
    Plan(PlanArgs),
    /// Manage raw materials
    #[command(subcommand)]
    Material(MaterialCommand),
    /// Manage products and their recipes
    #[command(subcommand)]
    Product(ProductCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum MaterialCommand {
    /// List raw materials and their stock
    List(CatalogArgs),
    /// Register a new raw material
    Add {
        #[command(flatten)]
        file: CatalogFile,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        stock: i64,
    },
    /// Replace a raw material's name and stock
    Update {
        #[command(flatten)]
        file: CatalogFile,
        #[arg(long)]
        id: MaterialId,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        stock: i64,
    },
    /// Remove a raw material no recipe uses
    Delete {
        #[command(flatten)]
        file: CatalogFile,
        #[arg(long)]
        id: MaterialId,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProductCommand {
    /// List products with their recipes
    List(CatalogArgs),
    /// Register a new product
    Add {
        #[command(flatten)]
        file: CatalogFile,
        #[arg(long)]
        name: String,
        /// Value of one unit
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
    },
    /// Add a material to a product's recipe
    Link {
        #[command(flatten)]
        file: CatalogFile,
        /// Product id
        #[arg(long)]
        id: ProductId,
        /// Material id
        #[arg(long)]
        material: MaterialId,
        /// Units of material per unit of product
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CatalogFile {
    /// Catalog seed file (JSON)
    #[arg(long, env = "PRODPLAN_CATALOG")]
    pub catalog: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub file: CatalogFile,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Deduct the planned material usage and rewrite the catalog file
    #[arg(long)]
    pub commit: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
