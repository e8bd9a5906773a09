//! Turning raw spreadsheet rows into catalog rows with stable ids.
//!
//! Ids are assigned by sorting the distinct names of each keyed entity and
//! numbering them from 1, so importing the same spreadsheets twice produces the
//! same ids. Products reference types, materials and workshops by name in the
//! source; those names are resolved to ids here.

use super::source::{RawCatalog, SourceRow};
use crate::{
    entities::{material_type, product, product_type, product_workshop, workshop},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::str::FromStr;

/// How source values are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Loss values are whole percentages (5 = 5%) and are divided by 100
    pub loss_percent_is_percentage: bool,
}

/// Normalized rows for all five tables, ready to write or load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedCatalog {
    /// `product_types` rows
    pub product_types: Vec<product_type::Model>,
    /// `material_types` rows
    pub material_types: Vec<material_type::Model>,
    /// `workshops` rows
    pub workshops: Vec<workshop::Model>,
    /// `products` rows
    pub products: Vec<product::Model>,
    /// `product_workshops` rows
    pub product_workshops: Vec<product_workshop::Model>,
}

/// Numbers the distinct, non-empty, trimmed names from 1 in sorted order.
pub fn stable_id_map<'a, I>(names: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .zip(1..)
        .collect()
}

fn row_error(file: &str, row: &SourceRow, message: impl std::fmt::Display) -> Error {
    Error::Import {
        message: format!("{file}, line {}: {message}", row.line),
    }
}

/// Parses a decimal cell, accepting `,` as the decimal separator.
fn parse_decimal(file: &str, row: &SourceRow, index: usize, field: &str) -> Result<Decimal> {
    let raw = row.cell(index);
    if raw.is_empty() {
        return Err(row_error(file, row, format!("{field} is empty")));
    }
    let normalized = raw.replace(',', ".").replace(' ', "");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| row_error(file, row, format!("{field} '{raw}' is not a number: {e}")))
}

fn parse_non_negative(file: &str, row: &SourceRow, index: usize, field: &str) -> Result<Decimal> {
    let value = parse_decimal(file, row, index, field)?;
    if value < Decimal::ZERO {
        return Err(row_error(file, row, format!("{field} must not be negative")));
    }
    Ok(value)
}

fn parse_people_count(file: &str, row: &SourceRow, index: usize) -> Result<i32> {
    let value = parse_decimal(file, row, index, "people count")?;
    match (value.fract().is_zero(), value.to_i32()) {
        (true, Some(count)) if count > 0 => Ok(count),
        _ => Err(row_error(
            file,
            row,
            format!("people count must be a positive whole number, got {value}"),
        )),
    }
}

/// Converts a manufacturing time in hours to whole minutes, rounding up.
///
/// An empty cell means no time in that workshop.
fn hours_to_minutes(file: &str, row: &SourceRow, index: usize) -> Result<i32> {
    if row.cell(index).is_empty() {
        return Ok(0);
    }
    let hours = parse_non_negative(file, row, index, "hours")?;
    hours
        .checked_mul(Decimal::from(60))
        .and_then(|minutes| minutes.ceil().to_i32())
        .ok_or_else(|| row_error(file, row, format!("{hours} hours is out of range")))
}

fn resolve(
    ids: &BTreeMap<String, i64>,
    file: &str,
    row: &SourceRow,
    index: usize,
    what: &str,
) -> Result<i64> {
    let name = row.cell(index);
    ids.get(name)
        .copied()
        .ok_or_else(|| row_error(file, row, format!("unknown {what} '{name}'")))
}

fn normalize_product_types(rows: &[SourceRow]) -> Result<Vec<product_type::Model>> {
    const FILE: &str = "product types";
    let ids = stable_id_map(rows.iter().map(|r| r.cell(0)));
    // A name listed twice keeps its last coefficient
    let mut coefficients = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.cell(0).is_empty()) {
        let coefficient = parse_non_negative(FILE, row, 1, "coefficient")?;
        coefficients.insert(row.cell(0), coefficient.round_dp(product_type::COEFFICIENT_SCALE));
    }
    Ok(ids
        .iter()
        .filter_map(|(name, &id)| {
            coefficients.get(name.as_str()).map(|&coefficient| product_type::Model {
                id,
                name: name.clone(),
                coefficient,
            })
        })
        .collect())
}

fn normalize_material_types(
    rows: &[SourceRow],
    options: NormalizeOptions,
) -> Result<Vec<material_type::Model>> {
    const FILE: &str = "material types";
    let ids = stable_id_map(rows.iter().map(|r| r.cell(0)));
    let mut losses = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.cell(0).is_empty()) {
        let mut loss = parse_non_negative(FILE, row, 1, "loss percent")?;
        if options.loss_percent_is_percentage {
            loss /= Decimal::ONE_HUNDRED;
        }
        losses.insert(row.cell(0), loss.round_dp(material_type::LOSS_PERCENT_SCALE));
    }
    Ok(ids
        .iter()
        .filter_map(|(name, &id)| {
            losses.get(name.as_str()).map(|&loss_percent| material_type::Model {
                id,
                name: name.clone(),
                loss_percent,
            })
        })
        .collect())
}

fn normalize_workshops(
    rows: &[SourceRow],
    ids: &BTreeMap<String, i64>,
) -> Result<Vec<workshop::Model>> {
    const FILE: &str = "workshops";
    let mut seen = HashSet::new();
    let mut workshops = Vec::new();
    for row in rows {
        let id = resolve(ids, FILE, row, 0, "workshop")?;
        // First row wins for duplicated workshops
        if !seen.insert(id) {
            continue;
        }
        let workshop_type = row.cell(1);
        if workshop_type.is_empty() {
            return Err(row_error(FILE, row, "workshop type is empty"));
        }
        workshops.push(workshop::Model {
            id,
            name: row.cell(0).to_string(),
            workshop_type: workshop_type.to_string(),
            people_count: parse_people_count(FILE, row, 2)?,
        });
    }
    Ok(workshops)
}

fn normalize_products(
    rows: &[SourceRow],
    ids: &BTreeMap<String, i64>,
    product_types: &BTreeMap<String, i64>,
    material_types: &BTreeMap<String, i64>,
) -> Result<Vec<product::Model>> {
    const FILE: &str = "products";
    let mut seen = HashSet::new();
    let mut articles = HashSet::new();
    let mut products = Vec::new();
    for row in rows {
        let id = resolve(ids, FILE, row, 1, "product")?;
        if !seen.insert(id) {
            continue;
        }
        let article = row.cell(2);
        if article.is_empty() {
            return Err(row_error(FILE, row, "article is empty"));
        }
        if !articles.insert(article.to_string()) {
            return Err(row_error(FILE, row, format!("article '{article}' is repeated")));
        }
        products.push(product::Model {
            id,
            product_type_id: resolve(product_types, FILE, row, 0, "product type")?,
            material_type_id: resolve(material_types, FILE, row, 4, "material")?,
            name: row.cell(1).to_string(),
            article: article.to_string(),
            min_partner_cost: parse_non_negative(FILE, row, 3, "min partner cost")?
                .round_dp(product::COST_SCALE),
        });
    }
    Ok(products)
}

fn normalize_product_workshops(
    rows: &[SourceRow],
    products: &BTreeMap<String, i64>,
    workshops: &BTreeMap<String, i64>,
) -> Result<Vec<product_workshop::Model>> {
    const FILE: &str = "product workshops";
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for row in rows {
        let product_id = resolve(products, FILE, row, 0, "product")?;
        let workshop_id = resolve(workshops, FILE, row, 1, "workshop")?;
        if !seen.insert((product_id, workshop_id)) {
            return Err(row_error(
                FILE,
                row,
                format!("'{}' is already timed in '{}'", row.cell(0), row.cell(1)),
            ));
        }
        links.push(product_workshop::Model {
            product_id,
            workshop_id,
            time_minutes: hours_to_minutes(FILE, row, 2)?,
        });
    }
    Ok(links)
}

/// Normalizes all source rows.
///
/// # Errors
/// Returns `Error::Import` naming the file and line of the first row that has
/// an unparsable or out-of-range value, references an unknown name, or repeats
/// an article or a product/workshop pair.
pub fn normalize(raw: &RawCatalog, options: NormalizeOptions) -> Result<NormalizedCatalog> {
    let product_types = normalize_product_types(&raw.product_types)?;
    let material_types = normalize_material_types(&raw.material_types, options)?;

    let product_type_ids = stable_id_map(raw.product_types.iter().map(|r| r.cell(0)));
    let material_type_ids = stable_id_map(raw.material_types.iter().map(|r| r.cell(0)));
    let workshop_ids = stable_id_map(raw.workshops.iter().map(|r| r.cell(0)));
    let product_ids = stable_id_map(raw.products.iter().map(|r| r.cell(1)));

    let workshops = normalize_workshops(&raw.workshops, &workshop_ids)?;
    let products = normalize_products(
        &raw.products,
        &product_ids,
        &product_type_ids,
        &material_type_ids,
    )?;
    let product_workshops =
        normalize_product_workshops(&raw.product_workshops, &product_ids, &workshop_ids)?;

    Ok(NormalizedCatalog {
        product_types,
        material_types,
        workshops,
        products,
        product_workshops,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;

    fn row(line: u64, cells: &[&str]) -> SourceRow {
        SourceRow {
            line,
            cells: cells.iter().map(ToString::to_string).collect(),
        }
    }

    fn sample() -> RawCatalog {
        RawCatalog {
            material_types: vec![
                row(2, &["Мебельный щит из массива дерева", "0,008"]),
                row(3, &["Ламинированное ДСП", "0.007"]),
            ],
            product_types: vec![
                row(2, &["Шкафы", "4.5"]),
                row(3, &["Кресла", "1.95"]),
            ],
            workshops: vec![
                row(2, &["Сушильный", "Сушка", "3"]),
                row(3, &["Проектный", "Проектирование", "4"]),
                row(4, &["Сушильный", "Сушка", "9"]),
            ],
            products: vec![
                row(
                    2,
                    &[
                        "Шкафы",
                        "Шкаф-купе 3-х дверный",
                        "7028748",
                        "27734.50",
                        "Ламинированное ДСП",
                    ],
                ),
                row(
                    3,
                    &[
                        "Кресла",
                        "Кресло офисное",
                        "1549922",
                        "15000",
                        "Мебельный щит из массива дерева",
                    ],
                ),
            ],
            product_workshops: vec![
                row(2, &["Кресло офисное", "Сушильный", "1.1"]),
                row(3, &["Кресло офисное", "Проектный", ""]),
                row(4, &["Шкаф-купе 3-х дверный", "Проектный", "0,5"]),
            ],
        }
    }

    #[test]
    fn test_stable_id_map_sorts_and_deduplicates() {
        let ids = stable_id_map(["  Столы", "Кресла", "", "Столы", "Диваны "]);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids["Диваны"], 1);
        assert_eq!(ids["Кресла"], 2);
        assert_eq!(ids["Столы"], 3);
    }

    #[test]
    fn test_normalize_assigns_sorted_ids() {
        let catalog = normalize(&sample(), NormalizeOptions::default()).unwrap();

        assert_eq!(catalog.product_types[0].name, "Кресла");
        assert_eq!(catalog.product_types[0].id, 1);
        assert_eq!(catalog.product_types[0].coefficient, Decimal::new(195, 2));
        assert_eq!(catalog.product_types[1].name, "Шкафы");

        assert_eq!(catalog.material_types[0].name, "Ламинированное ДСП");
        assert_eq!(catalog.material_types[1].loss_percent, Decimal::new(8, 3));

        let office_chair = &catalog.products[1];
        assert_eq!(office_chair.id, 1);
        assert_eq!(office_chair.product_type_id, 1);
        assert_eq!(office_chair.material_type_id, 2);
        assert_eq!(catalog.products[0].min_partner_cost, Decimal::new(2_773_450, 2));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let first = normalize(&sample(), NormalizeOptions::default()).unwrap();

        let mut shuffled = sample();
        shuffled.products.reverse();
        shuffled.product_types.reverse();
        shuffled.material_types.reverse();
        let second = normalize(&shuffled, NormalizeOptions::default()).unwrap();

        assert_eq!(first.product_types, second.product_types);
        assert_eq!(first.material_types, second.material_types);
        let mut a = first.products.clone();
        let mut b = second.products;
        a.sort_by_key(|p| p.id);
        b.sort_by_key(|p| p.id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_workshops_keep_first_duplicate() {
        let catalog = normalize(&sample(), NormalizeOptions::default()).unwrap();
        assert_eq!(catalog.workshops.len(), 2);
        let drying = catalog
            .workshops
            .iter()
            .find(|w| w.name == "Сушильный")
            .unwrap();
        assert_eq!(drying.people_count, 3);
        assert_eq!(drying.id, 2);
    }

    #[test]
    fn test_hours_become_rounded_up_minutes() {
        let catalog = normalize(&sample(), NormalizeOptions::default()).unwrap();
        let minutes: Vec<i32> = catalog
            .product_workshops
            .iter()
            .map(|l| l.time_minutes)
            .collect();
        // 1.1 h = 66 min exactly, empty = 0, 0,5 h = 30 min
        assert_eq!(minutes, vec![66, 0, 30]);

        let mut raw = sample();
        raw.product_workshops = vec![row(2, &["Кресло офисное", "Сушильный", "0.01"])];
        let catalog = normalize(&raw, NormalizeOptions::default()).unwrap();
        assert_eq!(catalog.product_workshops[0].time_minutes, 1);
    }

    #[test]
    fn test_loss_percent_as_percentage() {
        let mut raw = sample();
        raw.material_types = vec![
            row(2, &["Мебельный щит из массива дерева", "0,8"]),
            row(3, &["Ламинированное ДСП", "5"]),
        ];
        let options = NormalizeOptions {
            loss_percent_is_percentage: true,
        };
        let catalog = normalize(&raw, options).unwrap();
        assert_eq!(catalog.material_types[0].loss_percent, Decimal::new(5, 2));
        assert_eq!(catalog.material_types[1].loss_percent, Decimal::new(8, 3));
    }

    #[test]
    fn test_unknown_reference_names_the_row() {
        let mut raw = sample();
        raw.products[1].cells[4] = "Пластик".to_string();
        match normalize(&raw, NormalizeOptions::default()) {
            Err(Error::Import { message }) => {
                assert!(message.contains("line 3"));
                assert!(message.contains("Пластик"));
            }
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_workshop_without_type_is_rejected() {
        let mut raw = sample();
        raw.workshops[1].cells[1] = String::new();
        match normalize(&raw, NormalizeOptions::default()) {
            Err(Error::Import { message }) => {
                assert!(message.contains("line 3"));
                assert!(message.contains("workshop type"));
            }
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut raw = sample();
        raw.workshops[1].cells[2] = "0".to_string();
        assert!(matches!(
            normalize(&raw, NormalizeOptions::default()),
            Err(Error::Import { .. })
        ));

        let mut raw = sample();
        raw.product_types[0].cells[1] = "abc".to_string();
        assert!(matches!(
            normalize(&raw, NormalizeOptions::default()),
            Err(Error::Import { .. })
        ));

        let mut raw = sample();
        raw.product_workshops
            .push(row(5, &["Кресло офисное", "Сушильный", "2"]));
        assert!(matches!(
            normalize(&raw, NormalizeOptions::default()),
            Err(Error::Import { .. })
        ));
    }
}
