//! Loading a normalized catalog into the database.

use super::normalize::NormalizedCatalog;
use crate::{
    entities::{
        MaterialType, Product, ProductType, ProductWorkshop, Workshop, material_type, product,
        product_type, product_workshop, workshop,
    },
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, Set, TransactionTrait,
};
use std::fmt;
use tracing::{info, instrument};

/// Rows per `INSERT` statement, well under `SQLite`'s bound parameter limit.
const INSERT_CHUNK: usize = 500;

/// Rows inserted per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Product types inserted
    pub product_types: u64,
    /// Material types inserted
    pub material_types: u64,
    /// Workshops inserted
    pub workshops: u64,
    /// Products inserted
    pub products: u64,
    /// Product-workshop rows inserted
    pub product_workshops: u64,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} product types, {} material types, {} workshops, {} products, {} workshop timings",
            self.product_types,
            self.material_types,
            self.workshops,
            self.products,
            self.product_workshops
        )
    }
}

async fn insert_all<A, C>(db: &C, rows: Vec<A>) -> Result<u64>
where
    A: ActiveModelTrait + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let mut inserted = 0;
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<A> = rows.by_ref().take(INSERT_CHUNK).collect();
        inserted += <A::Entity as EntityTrait>::insert_many(chunk)
            .exec_without_returning(db)
            .await?;
    }
    Ok(inserted)
}

async fn catalog_is_empty<C: ConnectionTrait>(db: &C) -> Result<bool> {
    Ok(ProductType::find().count(db).await? == 0
        && MaterialType::find().count(db).await? == 0
        && Workshop::find().count(db).await? == 0
        && Product::find().count(db).await? == 0
        && ProductWorkshop::find().count(db).await? == 0)
}

async fn clear_catalog<C: ConnectionTrait>(db: &C) -> Result<()> {
    let links = ProductWorkshop::delete_many().exec(db).await?.rows_affected;
    let products = Product::delete_many().exec(db).await?.rows_affected;
    let workshops = Workshop::delete_many().exec(db).await?.rows_affected;
    let materials = MaterialType::delete_many().exec(db).await?.rows_affected;
    let types = ProductType::delete_many().exec(db).await?.rows_affected;
    info!(
        "Cleared {links} workshop timings, {products} products, {workshops} workshops, \
         {materials} material types, {types} product types"
    );
    Ok(())
}

/// Inserts the whole catalog in one transaction.
///
/// With `replace` the five tables are emptied first. Without it the tables must
/// already be empty, since the imported ids would collide with existing rows.
///
/// # Errors
/// Returns `Error::Import` if the catalog is not empty and `replace` is false,
/// or a database error, in which case nothing is written.
#[instrument(skip(db, catalog))]
pub async fn load_catalog(
    db: &DatabaseConnection,
    catalog: &NormalizedCatalog,
    replace: bool,
) -> Result<ImportSummary> {
    let txn = db.begin().await?;

    if replace {
        clear_catalog(&txn).await?;
    } else if !catalog_is_empty(&txn).await? {
        return Err(Error::Import {
            message: "the database already holds catalog rows, rerun with --replace".to_string(),
        });
    }

    let summary = ImportSummary {
        product_types: insert_all(
            &txn,
            catalog
                .product_types
                .iter()
                .map(|t| product_type::ActiveModel {
                    id: Set(t.id),
                    name: Set(t.name.clone()),
                    coefficient: Set(t.coefficient),
                })
                .collect(),
        )
        .await?,
        material_types: insert_all(
            &txn,
            catalog
                .material_types
                .iter()
                .map(|m| material_type::ActiveModel {
                    id: Set(m.id),
                    name: Set(m.name.clone()),
                    loss_percent: Set(m.loss_percent),
                })
                .collect(),
        )
        .await?,
        workshops: insert_all(
            &txn,
            catalog
                .workshops
                .iter()
                .map(|w| workshop::ActiveModel {
                    id: Set(w.id),
                    name: Set(w.name.clone()),
                    workshop_type: Set(w.workshop_type.clone()),
                    people_count: Set(w.people_count),
                })
                .collect(),
        )
        .await?,
        products: insert_all(
            &txn,
            catalog
                .products
                .iter()
                .map(|p| product::ActiveModel {
                    id: Set(p.id),
                    product_type_id: Set(p.product_type_id),
                    material_type_id: Set(p.material_type_id),
                    name: Set(p.name.clone()),
                    article: Set(p.article.clone()),
                    min_partner_cost: Set(p.min_partner_cost),
                })
                .collect(),
        )
        .await?,
        product_workshops: insert_all(
            &txn,
            catalog
                .product_workshops
                .iter()
                .map(|l| product_workshop::ActiveModel {
                    product_id: Set(l.product_id),
                    workshop_id: Set(l.workshop_id),
                    time_minutes: Set(l.time_minutes),
                })
                .collect(),
        )
        .await?,
    };

    txn.commit().await?;
    info!("Imported {summary}");
    Ok(summary)
}
