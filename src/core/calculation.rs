//! Derived calculations for production planning.
//!
//! Both results round up: a planner has to reserve a whole hour for a single
//! extra minute, and raw material can only be ordered in whole units. Material
//! arithmetic stays in `Decimal` until the final ceiling.

use crate::{
    core::{
        material_type::get_material_type_by_id, product::get_product,
        product_type::get_product_type_by_id,
    },
    entities::{ProductWorkshop, material_type, product_type, product_workshop},
    errors::{Error, Result},
};
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Total manufacturing time of a product across all its workshops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalTime {
    /// Product the total belongs to
    pub product_id: i64,
    /// Sum of the per-workshop minutes
    pub total_time_minutes: i64,
    /// `total_time_minutes / 60`, rounded up
    pub total_time_hours_int: i64,
}

/// Converts minutes into whole hours, counting any started hour as a full one.
#[must_use]
pub const fn minutes_to_whole_hours(minutes: i64) -> i64 {
    if minutes <= 0 {
        0
    } else {
        (minutes + 59) / 60
    }
}

/// Raw material needed for `count` units: `ceil(coefficient * count * (1 + loss_percent))`.
///
/// # Errors
/// Returns `InvalidArgument` if `count` is not positive or the result does not fit in `i64`.
pub fn material_amount(coefficient: Decimal, loss_percent: Decimal, count: i64) -> Result<i64> {
    if count <= 0 {
        return Err(Error::invalid(format!("count must be positive, got {count}")));
    }

    let overflow = || Error::invalid(format!("material amount for {count} units is too large"));
    let amount = coefficient
        .checked_mul(Decimal::from(count))
        .and_then(|base| base.checked_mul(Decimal::ONE + loss_percent))
        .ok_or_else(overflow)?;

    amount.ceil().to_i64().ok_or_else(overflow)
}

/// Sums the manufacturing minutes of a product, 0 when it has no workshops.
///
/// Does not check that the product exists; see [`total_time`].
pub async fn total_time_minutes<C>(db: &C, product_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = ProductWorkshop::find()
        .select_only()
        .column_as(product_workshop::Column::TimeMinutes.sum(), "total")
        .filter(product_workshop::Column::ProductId.eq(product_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Computes the total manufacturing time of a product in minutes and whole hours.
///
/// # Errors
/// Returns `NotFound` if the product does not exist, or an error if the query fails.
#[instrument(skip(db))]
pub async fn total_time(db: &DatabaseConnection, product_id: i64) -> Result<TotalTime> {
    get_product(db, product_id).await?;
    let minutes = total_time_minutes(db, product_id).await?;
    let result = TotalTime {
        product_id,
        total_time_minutes: minutes,
        total_time_hours_int: minutes_to_whole_hours(minutes),
    };
    debug!(?result, "Total time computed");
    Ok(result)
}

/// Computes the raw material needed to make `count` products of a type from a material.
///
/// Stored decimals are rounded back to their column scale before use, which
/// strips any noise picked up by the REAL storage.
///
/// # Errors
/// Returns an error if:
/// - `count` is not positive (`InvalidArgument`)
/// - The product type or material type does not exist (`ReferenceNotFound`)
/// - The result overflows (`InvalidArgument`)
/// - The database query fails
#[instrument(skip(db))]
pub async fn required_material(
    db: &DatabaseConnection,
    product_type_id: i64,
    material_type_id: i64,
    count: i64,
) -> Result<i64> {
    if count <= 0 {
        return Err(Error::invalid(format!("count must be positive, got {count}")));
    }

    let product_type = get_product_type_by_id(db, product_type_id)
        .await?
        .ok_or(Error::ReferenceNotFound {
            entity: "product_type",
            id: product_type_id,
        })?;
    let material_type = get_material_type_by_id(db, material_type_id)
        .await?
        .ok_or(Error::ReferenceNotFound {
            entity: "material_type",
            id: material_type_id,
        })?;

    let amount = material_amount(
        product_type
            .coefficient
            .round_dp(product_type::COEFFICIENT_SCALE),
        material_type
            .loss_percent
            .round_dp(material_type::LOSS_PERCENT_SCALE),
        count,
    )?;
    debug!(amount, "Required material computed");
    Ok(amount)
}
