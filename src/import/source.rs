//! Reading the CSV exports of the source spreadsheets.
//!
//! Columns are located by header name, so column order in the export does not
//! matter. Every cell is trimmed and fully blank rows are skipped.

use crate::config::import::SourceFiles;
use crate::errors::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::path::Path;

/// Header names used by the source spreadsheets.
pub mod columns {
    /// Material type name
    pub const MATERIAL_TYPE: &str = "Тип материала";
    /// Material loss
    pub const LOSS_PERCENT: &str = "Процент потерь сырья";
    /// Product type name
    pub const PRODUCT_TYPE: &str = "Тип продукции";
    /// Product type coefficient
    pub const COEFFICIENT: &str = "Коэффициент типа продукции";
    /// Workshop name
    pub const WORKSHOP: &str = "Название цеха";
    /// Workshop category
    pub const WORKSHOP_TYPE: &str = "Тип цеха";
    /// Workshop staffing
    pub const PEOPLE_COUNT: &str = "Количество человек для производства";
    /// Product name
    pub const PRODUCT: &str = "Наименование продукции";
    /// Product article
    pub const ARTICLE: &str = "Артикул";
    /// Minimum partner price
    pub const MIN_PARTNER_COST: &str = "Минимальная стоимость для партнера";
    /// Main material of a product
    pub const MAIN_MATERIAL: &str = "Основной материал";
    /// Manufacturing time in hours
    pub const HOURS: &str = "Время изготовления, ч";
}

/// One data row: its line number in the file and the requested cells in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based line in the source file
    pub line: u64,
    /// Trimmed cells, in the order the columns were requested
    pub cells: Vec<String>,
}

impl SourceRow {
    /// Cell at `index`, empty when the row is short.
    #[must_use]
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }
}

/// Raw rows of all five source files.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    /// `[name, loss_percent]`
    pub material_types: Vec<SourceRow>,
    /// `[name, coefficient]`
    pub product_types: Vec<SourceRow>,
    /// `[name, workshop_type, people_count]`
    pub workshops: Vec<SourceRow>,
    /// `[product_type, name, article, min_partner_cost, main_material]`
    pub products: Vec<SourceRow>,
    /// `[product, workshop, hours]`
    pub product_workshops: Vec<SourceRow>,
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

/// Reads the requested columns of a CSV file with a header row.
///
/// # Errors
/// Returns an error if the file cannot be read or a requested column is missing.
pub fn read_rows(path: &Path, wanted: &[&str]) -> Result<Vec<SourceRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let header_map = build_header_map(reader.headers()?);
    let indexes = wanted
        .iter()
        .map(|column| {
            header_map
                .get(&column.trim().to_lowercase())
                .copied()
                .ok_or_else(|| Error::Import {
                    message: format!("{}: missing column '{column}'", path.display()),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);
        let cells = indexes
            .iter()
            .map(|&i| record.get(i).unwrap_or("").trim().to_string())
            .collect();
        rows.push(SourceRow { line, cells });
    }

    tracing::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reads all five source files.
///
/// # Errors
/// Returns an error if any file cannot be read or lacks a required column.
pub fn read_sources(sources: &SourceFiles) -> Result<RawCatalog> {
    use columns::{
        ARTICLE, COEFFICIENT, HOURS, LOSS_PERCENT, MAIN_MATERIAL, MATERIAL_TYPE,
        MIN_PARTNER_COST, PEOPLE_COUNT, PRODUCT, PRODUCT_TYPE, WORKSHOP, WORKSHOP_TYPE,
    };

    Ok(RawCatalog {
        material_types: read_rows(&sources.material_types, &[MATERIAL_TYPE, LOSS_PERCENT])?,
        product_types: read_rows(&sources.product_types, &[PRODUCT_TYPE, COEFFICIENT])?,
        workshops: read_rows(&sources.workshops, &[WORKSHOP, WORKSHOP_TYPE, PEOPLE_COUNT])?,
        products: read_rows(
            &sources.products,
            &[
                PRODUCT_TYPE,
                PRODUCT,
                ARTICLE,
                MIN_PARTNER_COST,
                MAIN_MATERIAL,
            ],
        )?,
        product_workshops: read_rows(&sources.product_workshops, &[PRODUCT, WORKSHOP, HOURS])?,
    })
}
