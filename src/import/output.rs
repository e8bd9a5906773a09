//! Writing the normalized catalog as one CSV file per table.

use super::normalize::NormalizedCatalog;
use crate::{
    entities::{MaterialType, Product, ProductType, ProductWorkshop, Workshop},
    errors::Result,
};
use csv::WriterBuilder;
use sea_orm::{EntityTrait, IdenStatic, Iterable};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `rows` under a header of `E`'s column names, so empty tables keep it too.
fn write_table<E>(dir: &Path, file_name: &str, rows: &[E::Model]) -> Result<PathBuf>
where
    E: EntityTrait,
    E::Model: Serialize,
{
    let path = dir.join(file_name);
    let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
    writer.write_record(E::Column::iter().map(|column| column.as_str().to_string()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Writes `product_types.csv`, `material_types.csv`, `workshops.csv`,
/// `products.csv` and `product_workshops.csv` into `dir`, creating it if needed.
///
/// Column names match the database columns.
///
/// # Errors
/// Returns an error if the directory or a file cannot be written.
pub fn write_csv(catalog: &NormalizedCatalog, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    Ok(vec![
        write_table::<ProductType>(dir, "product_types.csv", &catalog.product_types)?,
        write_table::<MaterialType>(dir, "material_types.csv", &catalog.material_types)?,
        write_table::<Workshop>(dir, "workshops.csv", &catalog.workshops)?,
        write_table::<Product>(dir, "products.csv", &catalog.products)?,
        write_table::<ProductWorkshop>(
            dir,
            "product_workshops.csv",
            &catalog.product_workshops,
        )?,
    ])
}
