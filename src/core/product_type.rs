//! Product type business logic.
//!
//! Product types are seeded by the importer and rarely change afterwards; the
//! catalog needs them to validate products and to compute material requirements.

use crate::{
    entities::{ProductType, product_type},
    errors::{Error, Result, WriteTarget},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves all product types ordered by id.
pub async fn list_product_types(db: &DatabaseConnection) -> Result<Vec<product_type::Model>> {
    ProductType::find()
        .order_by_asc(product_type::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product type by id, returning None if it does not exist.
pub async fn get_product_type_by_id<C>(
    db: &C,
    product_type_id: i64,
) -> Result<Option<product_type::Model>>
where
    C: ConnectionTrait,
{
    ProductType::find_by_id(product_type_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a product type after validating its name and coefficient.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only (`InvalidArgument`)
/// - The coefficient is negative (`InvalidArgument`)
/// - Another product type already has this name (`UniquenessViolation`)
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_product_type(
    db: &DatabaseConnection,
    name: &str,
    coefficient: Decimal,
) -> Result<product_type::Model> {
    let name = super::required_text("product type name", name)?;
    if coefficient < Decimal::ZERO {
        return Err(Error::invalid(format!(
            "coefficient must not be negative, got {coefficient}"
        )));
    }

    let taken = ProductType::find()
        .filter(product_type::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::UniquenessViolation {
            entity: "product_type",
            field: "name",
            value: name,
        });
    }

    let model = product_type::ActiveModel {
        name: Set(name.clone()),
        coefficient: Set(coefficient.round_dp(product_type::COEFFICIENT_SCALE)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| {
        Error::from_write(
            e,
            &WriteTarget {
                entity: "product_type",
                unique: &[("name", name.as_str())],
                references: &[],
            },
        )
    })?;

    info!(id = model.id, "Product type created");
    Ok(model)
}
