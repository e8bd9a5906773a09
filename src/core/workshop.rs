//! Workshop business logic.
//!
//! Workshops are production stations. A product's route through the workshops is
//! stored in `product_workshops`, one row per (product, workshop) pair with the
//! time the product spends there.

use crate::{
    core::product::get_product,
    entities::{ProductWorkshop, Workshop, product_workshop, workshop},
    errors::{Error, Result, WriteTarget},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A workshop on a product's route, with the time the product spends there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWorkshopRow {
    /// Product the route belongs to
    pub product_id: i64,
    /// Workshop id
    pub workshop_id: i64,
    /// Workshop name
    pub workshop_name: String,
    /// Workshop category
    pub workshop_type: String,
    /// People needed to run the workshop
    pub people_count: i32,
    /// Minutes the product spends in this workshop
    pub time_minutes: i32,
}

impl ProductWorkshopRow {
    fn from_parts(link: product_workshop::Model, workshop: workshop::Model) -> Self {
        Self {
            product_id: link.product_id,
            workshop_id: link.workshop_id,
            workshop_name: workshop.name,
            workshop_type: workshop.workshop_type,
            people_count: workshop.people_count,
            time_minutes: link.time_minutes,
        }
    }
}

/// Retrieves all workshops ordered by id.
pub async fn list_workshops(db: &DatabaseConnection) -> Result<Vec<workshop::Model>> {
    Workshop::find()
        .order_by_asc(workshop::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a workshop by id, returning None if it does not exist.
pub async fn get_workshop_by_id<C>(db: &C, workshop_id: i64) -> Result<Option<workshop::Model>>
where
    C: ConnectionTrait,
{
    Workshop::find_by_id(workshop_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a workshop.
///
/// # Errors
/// Returns an error if:
/// - The name or type is empty, or `people_count` is not positive (`InvalidArgument`)
/// - Another workshop already has this name (`UniquenessViolation`)
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_workshop(
    db: &DatabaseConnection,
    name: &str,
    workshop_type: &str,
    people_count: i32,
) -> Result<workshop::Model> {
    let name = super::required_text("workshop name", name)?;
    let workshop_type = super::required_text("workshop type", workshop_type)?;
    if people_count <= 0 {
        return Err(Error::invalid(format!(
            "people_count must be positive, got {people_count}"
        )));
    }

    let taken = Workshop::find()
        .filter(workshop::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::UniquenessViolation {
            entity: "workshop",
            field: "name",
            value: name,
        });
    }

    let model = workshop::ActiveModel {
        name: Set(name.clone()),
        workshop_type: Set(workshop_type),
        people_count: Set(people_count),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| {
        Error::from_write(
            e,
            &WriteTarget {
                entity: "workshop",
                unique: &[("name", name.as_str())],
                references: &[],
            },
        )
    })?;

    info!(id = model.id, "Workshop created");
    Ok(model)
}

/// Adds a workshop to a product's route with the time the product spends there.
///
/// # Errors
/// Returns an error if:
/// - `time_minutes` is negative (`InvalidArgument`)
/// - The product does not exist (`NotFound`)
/// - The workshop does not exist (`ReferenceNotFound`)
/// - The product already has a timing for this workshop (`UniquenessViolation`)
/// - The database operation fails
#[instrument(skip(db))]
pub async fn assign_workshop(
    db: &DatabaseConnection,
    product_id: i64,
    workshop_id: i64,
    time_minutes: i32,
) -> Result<product_workshop::Model> {
    if time_minutes < 0 {
        return Err(Error::invalid(format!(
            "time_minutes must not be negative, got {time_minutes}"
        )));
    }

    let txn = db.begin().await?;
    get_product(&txn, product_id).await?;
    if get_workshop_by_id(&txn, workshop_id).await?.is_none() {
        return Err(Error::ReferenceNotFound {
            entity: "workshop",
            id: workshop_id,
        });
    }
    let pair = format!("{product_id}/{workshop_id}");
    if ProductWorkshop::find_by_id((product_id, workshop_id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::UniquenessViolation {
            entity: "product_workshop",
            field: "product_id/workshop_id",
            value: pair,
        });
    }

    let model = product_workshop::ActiveModel {
        product_id: Set(product_id),
        workshop_id: Set(workshop_id),
        time_minutes: Set(time_minutes),
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        Error::from_write(
            e,
            &WriteTarget {
                entity: "product_workshop",
                unique: &[("product_id/workshop_id", pair.as_str())],
                references: &[("workshop", workshop_id), ("product", product_id)],
            },
        )
    })?;
    txn.commit().await?;

    Ok(model)
}

/// Lists the workshops a product passes through, ordered by workshop id.
///
/// # Errors
/// Returns `NotFound` if the product does not exist, or an error if the query fails.
pub async fn workshops_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<ProductWorkshopRow>> {
    get_product(db, product_id).await?;

    let rows = ProductWorkshop::find()
        .filter(product_workshop::Column::ProductId.eq(product_id))
        .order_by_asc(product_workshop::Column::WorkshopId)
        .find_also_related(Workshop)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(link, workshop)| {
            workshop.map(|workshop| ProductWorkshopRow::from_parts(link, workshop))
        })
        .collect())
}
