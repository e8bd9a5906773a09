//! Spreadsheet import: CSV exports of the source spreadsheets are read,
//! normalized into catalog rows with deterministic ids, and then written out
//! as CSV and/or loaded into the database.

pub mod loader;
pub mod normalize;
pub mod output;
pub mod source;

pub use loader::{ImportSummary, load_catalog};
pub use normalize::{NormalizeOptions, NormalizedCatalog, normalize, stable_id_map};
pub use output::write_csv;

use crate::{config::import::ImportConfig, errors::Result};
use tracing::info;

/// Reads and normalizes every source file named by `config`.
///
/// # Errors
/// Returns an error if a source file cannot be read or its rows fail to normalize.
pub fn prepare(config: &ImportConfig) -> Result<NormalizedCatalog> {
    let raw = source::read_sources(&config.sources)?;
    let catalog = normalize(
        &raw,
        NormalizeOptions {
            loss_percent_is_percentage: config.loss_percent_is_percentage,
        },
    )?;
    info!(
        "Normalized {} product types, {} material types, {} workshops, {} products, {} timings",
        catalog.product_types.len(),
        catalog.material_types.len(),
        catalog.workshops.len(),
        catalog.products.len(),
        catalog.product_workshops.len()
    );
    Ok(catalog)
}
