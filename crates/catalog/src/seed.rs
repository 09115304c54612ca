//! JSON seed files.
//!
//! A seed has the same shape as a [`CatalogSnapshot`]:
//!
//! ```json
//! {
//!   "materials": [{ "id": 1, "name": "Wood", "stockQuantity": 100 }],
//!   "products": [
//!     { "id": 1, "name": "Table", "unitValue": 50.0,
//!       "recipe": [{ "materialId": 1, "requiredQuantity": 10 }] }
//!   ]
//! }
//! ```
//!
//! Loading replays the seed as catalog commands, so seed files get the same
//! validation as interactive writes.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use prodplan_core::DomainError;
use prodplan_planner::CatalogSnapshot;

use crate::catalog::Catalog;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to access seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("seed rejected by catalog: {0}")]
    Domain(#[from] DomainError),
}

/// Build a catalog from seed JSON.
pub fn parse_seed(json: &str) -> Result<Catalog, SeedError> {
    let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
    Ok(Catalog::from_snapshot(&snapshot, Utc::now())?)
}

pub fn read_seed(path: &Path) -> Result<Catalog, SeedError> {
    let json = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_seed(&json)?;
    info!(
        path = %path.display(),
        materials = catalog.materials().count(),
        products = catalog.products().len(),
        "catalog seed loaded"
    );
    Ok(catalog)
}

/// Write the catalog back out in seed format (pretty-printed).
pub fn write_seed(path: &Path, catalog: &Catalog) -> Result<(), SeedError> {
    let json = serde_json::to_string_pretty(&catalog.snapshot())?;
    fs::write(path, json).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "catalog seed written");
    Ok(())
}
