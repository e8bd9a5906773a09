//! Core business logic, independent of the HTTP layer and the importer.

/// Total-time and material-requirement calculations
pub mod calculation;
/// Material type lookups and creation
pub mod material_type;
/// Product CRUD
pub mod product;
/// Product type lookups and creation
pub mod product_type;
/// Workshops and product routes
pub mod workshop;

use crate::errors::{Error, Result};

/// Trims `value`, rejecting it when nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
