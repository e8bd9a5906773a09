//! Product business logic - Handles all product-related operations.
//!
//! Products reference a product type and a main material type, and carry two
//! globally unique identifiers: the name and the catalog article. Creation and
//! updates validate both references and both unique fields inside a single
//! database transaction, so a rejected write never leaves partial state behind.

use crate::{
    core::{material_type::get_material_type_by_id, product_type::get_product_type_by_id},
    entities::{Product, product},
    errors::{Error, Result, WriteTarget},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Input for [`create_product`]. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Unique product name
    pub name: String,
    /// Unique catalog article
    pub article: String,
    /// Minimum partner price, must not be negative
    pub min_partner_cost: Decimal,
    /// Existing product type id
    pub product_type_id: i64,
    /// Existing material type id
    pub material_type_id: i64,
}

/// Input for [`update_product`].
///
/// `None` leaves the stored value untouched; `Some` replaces it, subject to the
/// same validation as on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductChanges {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New article
    #[serde(default)]
    pub article: Option<String>,
    /// New minimum partner price
    #[serde(default)]
    pub min_partner_cost: Option<Decimal>,
    /// New product type id
    #[serde(default)]
    pub product_type_id: Option<i64>,
    /// New material type id
    #[serde(default)]
    pub material_type_id: Option<i64>,
}

impl ProductChanges {
    /// Whether no field is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.article.is_none()
            && self.min_partner_cost.is_none()
            && self.product_type_id.is_none()
            && self.material_type_id.is_none()
    }
}

/// Retrieves all products in storage order (ascending id).
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product, failing with `NotFound` when it does not exist.
pub async fn get_product<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })
}

fn validate_cost(cost: Decimal) -> Result<Decimal> {
    if cost < Decimal::ZERO {
        return Err(Error::invalid(format!(
            "min_partner_cost must not be negative, got {cost}"
        )));
    }
    Ok(cost.round_dp(product::COST_SCALE))
}

async fn ensure_product_type<C: ConnectionTrait>(db: &C, id: i64) -> Result<()> {
    match get_product_type_by_id(db, id).await? {
        Some(_) => Ok(()),
        None => Err(Error::ReferenceNotFound {
            entity: "product_type",
            id,
        }),
    }
}

async fn ensure_material_type<C: ConnectionTrait>(db: &C, id: i64) -> Result<()> {
    match get_material_type_by_id(db, id).await? {
        Some(_) => Ok(()),
        None => Err(Error::ReferenceNotFound {
            entity: "material_type",
            id,
        }),
    }
}

/// Fails if another product (other than `except`) already holds `value` in `column`.
async fn ensure_unique<C: ConnectionTrait>(
    db: &C,
    column: product::Column,
    field: &'static str,
    value: &str,
    except: Option<i64>,
) -> Result<()> {
    let mut query = Product::find().filter(column.eq(value));
    if let Some(id) = except {
        query = query.filter(product::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::UniquenessViolation {
            entity: "product",
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Creates a new product after validating its fields, references and uniqueness.
///
/// Name and article are trimmed before they are checked and stored.
///
/// # Errors
/// Returns an error if:
/// - The name or article is empty, or the cost is negative (`InvalidArgument`)
/// - The product type or material type does not exist (`ReferenceNotFound`)
/// - The name or article is already used by another product (`UniquenessViolation`)
/// - The database operation fails
#[instrument(skip(db, new_product), fields(name = %new_product.name))]
pub async fn create_product(
    db: &DatabaseConnection,
    new_product: NewProduct,
) -> Result<product::Model> {
    let name = super::required_text("name", &new_product.name)?;
    let article = super::required_text("article", &new_product.article)?;
    let cost = validate_cost(new_product.min_partner_cost)?;

    let txn = db.begin().await?;
    ensure_product_type(&txn, new_product.product_type_id).await?;
    ensure_material_type(&txn, new_product.material_type_id).await?;
    ensure_unique(&txn, product::Column::Name, "name", &name, None).await?;
    ensure_unique(&txn, product::Column::Article, "article", &article, None).await?;

    let model = product::ActiveModel {
        product_type_id: Set(new_product.product_type_id),
        material_type_id: Set(new_product.material_type_id),
        name: Set(name.clone()),
        article: Set(article.clone()),
        min_partner_cost: Set(cost),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        Error::from_write(
            e,
            &WriteTarget {
                entity: "product",
                unique: &[("name", name.as_str()), ("article", article.as_str())],
                references: &[
                    ("product_type", new_product.product_type_id),
                    ("material_type", new_product.material_type_id),
                ],
            },
        )
    })?;
    txn.commit().await?;

    info!(id = model.id, "Product created");
    Ok(model)
}

/// Applies a partial update to an existing product.
///
/// Only the fields present in `changes` are written. A product keeping its own
/// name or article does not count as a collision.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist (`NotFound`)
/// - A supplied name or article is empty, or the cost is negative (`InvalidArgument`)
/// - A supplied product type or material type does not exist (`ReferenceNotFound`)
/// - A supplied name or article belongs to another product (`UniquenessViolation`)
/// - The database operation fails
#[instrument(skip(db, changes))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: ProductChanges,
) -> Result<product::Model> {
    let name = changes
        .name
        .as_deref()
        .map(|n| super::required_text("name", n))
        .transpose()?;
    let article = changes
        .article
        .as_deref()
        .map(|a| super::required_text("article", a))
        .transpose()?;
    let cost = changes.min_partner_cost.map(validate_cost).transpose()?;

    let txn = db.begin().await?;
    let existing = get_product(&txn, product_id).await?;
    if changes.is_empty() {
        debug!("No fields supplied, product left as is");
        return Ok(existing);
    }

    let final_name = name.clone().unwrap_or_else(|| existing.name.clone());
    let final_article = article.clone().unwrap_or_else(|| existing.article.clone());
    let references = [
        (
            "product_type",
            changes.product_type_id.unwrap_or(existing.product_type_id),
        ),
        (
            "material_type",
            changes.material_type_id.unwrap_or(existing.material_type_id),
        ),
    ];
    let mut product: product::ActiveModel = existing.into();

    if let Some(type_id) = changes.product_type_id {
        ensure_product_type(&txn, type_id).await?;
        product.product_type_id = Set(type_id);
    }
    if let Some(material_id) = changes.material_type_id {
        ensure_material_type(&txn, material_id).await?;
        product.material_type_id = Set(material_id);
    }
    if let Some(name) = name {
        ensure_unique(&txn, product::Column::Name, "name", &name, Some(product_id)).await?;
        product.name = Set(name);
    }
    if let Some(article) = article {
        ensure_unique(
            &txn,
            product::Column::Article,
            "article",
            &article,
            Some(product_id),
        )
        .await?;
        product.article = Set(article);
    }
    if let Some(cost) = cost {
        product.min_partner_cost = Set(cost);
    }

    let updated = product.update(&txn).await.map_err(|e| {
        Error::from_write(
            e,
            &WriteTarget {
                entity: "product",
                unique: &[
                    ("name", final_name.as_str()),
                    ("article", final_article.as_str()),
                ],
                references: &references,
            },
        )
    })?;
    txn.commit().await?;

    info!(id = updated.id, "Product updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn new_product(name: &str, article: &str, refs: &References) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            article: article.to_string(),
            min_partner_cost: Decimal::new(1250050, 2),
            product_type_id: refs.product_type.id,
            material_type_id: refs.material_type.id,
        }
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let base = NewProduct {
            name: "Кресло".to_string(),
            article: "1549922".to_string(),
            min_partner_cost: Decimal::ONE,
            product_type_id: 1,
            material_type_id: 1,
        };

        let result = create_product(
            &db,
            NewProduct {
                name: "   ".to_string(),
                ..base.clone()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let result = create_product(
            &db,
            NewProduct {
                article: String::new(),
                ..base.clone()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let result = create_product(
            &db,
            NewProduct {
                min_partner_cost: Decimal::new(-1, 2),
                ..base
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_round_trip() -> Result<()> {
        let (db, refs) = setup_with_references().await?;

        let created = create_product(&db, new_product(" Полка настенная ", "7028748", &refs)).await?;
        assert_eq!(created.name, "Полка настенная");
        assert_eq!(created.article, "7028748");
        assert_eq!(created.min_partner_cost, Decimal::new(1250050, 2));
        assert_eq!(created.product_type_id, refs.product_type.id);
        assert_eq!(created.material_type_id, refs.material_type.id);

        let fetched = get_product(&db, created.id).await?;
        assert_eq!(fetched, created);

        let listed = list_products(&db).await?;
        assert_eq!(listed, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_assigns_fresh_ids() -> Result<()> {
        let (db, refs) = setup_with_references().await?;

        let first = create_product(&db, new_product("A", "1", &refs)).await?;
        let second = create_product(&db, new_product("B", "2", &refs)).await?;
        let third = create_product(&db, new_product("C", "3", &refs)).await?;

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);
        assert_ne!(first.id, third.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_product_type() -> Result<()> {
        let (db, refs) = setup_with_references().await?;

        let mut input = new_product("Стол", "3028272", &refs);
        input.product_type_id = 999;
        let result = create_product(&db, input).await;
        assert!(matches!(
            result,
            Err(Error::ReferenceNotFound {
                entity: "product_type",
                id: 999
            })
        ));
        assert!(list_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_material_type() -> Result<()> {
        let (db, refs) = setup_with_references().await?;

        let mut input = new_product("Стол", "3028272", &refs);
        input.material_type_id = 999;
        let result = create_product(&db, input).await;
        assert!(matches!(
            result,
            Err(Error::ReferenceNotFound {
                entity: "material_type",
                ..
            })
        ));
        assert!(list_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_duplicate_name_or_article() -> Result<()> {
        let (db, refs) = setup_with_references().await?;
        create_product(&db, new_product("Стол", "3028272", &refs)).await?;

        let result = create_product(&db, new_product("Стол", "9999999", &refs)).await;
        assert!(matches!(
            result,
            Err(Error::UniquenessViolation { field: "name", .. })
        ));

        let result = create_product(&db, new_product("Другой стол", "3028272", &refs)).await;
        assert!(matches!(
            result,
            Err(Error::UniquenessViolation {
                field: "article",
                ..
            })
        ));

        assert_eq!(list_products(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let changes = ProductChanges {
            name: Some("Новое имя".to_string()),
            ..Default::default()
        };
        let result = update_product(&db, 42, changes).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "product",
                id: 42
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_partial() -> Result<()> {
        let (db, refs) = setup_with_references().await?;
        let product = create_product(&db, new_product("Стол", "3028272", &refs)).await?;

        let changes = ProductChanges {
            min_partner_cost: Some(Decimal::new(9900, 2)),
            ..Default::default()
        };
        let updated = update_product(&db, product.id, changes.clone()).await?;
        assert_eq!(updated.min_partner_cost, Decimal::new(9900, 2));
        assert_eq!(updated.name, product.name);
        assert_eq!(updated.article, product.article);
        assert_eq!(updated.product_type_id, product.product_type_id);
        assert_eq!(updated.material_type_id, product.material_type_id);

        // Applying the same partial update again changes nothing further
        let again = update_product(&db, product.id, changes).await?;
        assert_eq!(again, updated);
        assert_eq!(get_product(&db, product.id).await?, updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_empty_changes() -> Result<()> {
        let (db, refs) = setup_with_references().await?;
        let product = create_product(&db, new_product("Стол", "3028272", &refs)).await?;

        let unchanged = update_product(&db, product.id, ProductChanges::default()).await?;
        assert_eq!(unchanged, product);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_keeps_own_name() -> Result<()> {
        let (db, refs) = setup_with_references().await?;
        let product = create_product(&db, new_product("Стол", "3028272", &refs)).await?;

        let changes = ProductChanges {
            name: Some("Стол".to_string()),
            article: Some("3028272".to_string()),
            ..Default::default()
        };
        let updated = update_product(&db, product.id, changes).await?;
        assert_eq!(updated, product);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_revalidates() -> Result<()> {
        let (db, refs) = setup_with_references().await?;
        let first = create_product(&db, new_product("Стол", "3028272", &refs)).await?;
        let second = create_product(&db, new_product("Шкаф", "4028272", &refs)).await?;

        let result = update_product(
            &db,
            second.id,
            ProductChanges {
                article: Some(first.article.clone()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::UniquenessViolation {
                field: "article",
                ..
            })
        ));

        let result = update_product(
            &db,
            second.id,
            ProductChanges {
                material_type_id: Some(777),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::ReferenceNotFound { .. })));

        let result = update_product(
            &db,
            second.id,
            ProductChanges {
                min_partner_cost: Some(Decimal::NEGATIVE_ONE),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        // Nothing was written by the rejected updates
        assert_eq!(get_product(&db, second.id).await?, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_changes_references() -> Result<()> {
        let (db, refs) = setup_with_references().await?;
        let product = create_product(&db, new_product("Стол", "3028272", &refs)).await?;
        let other_type =
            create_test_product_type(&db, "Столы", Decimal::new(55, 1)).await?;

        let updated = update_product(
            &db,
            product.id,
            ProductChanges {
                product_type_id: Some(other_type.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.product_type_id, other_type.id);
        assert_eq!(updated.material_type_id, refs.material_type.id);
        Ok(())
    }

    #[test]
    fn test_product_changes_deserialize_omitted_fields() {
        let changes: ProductChanges =
            serde_json::from_str(r#"{"min_partner_cost": 15.5}"#).unwrap();
        assert_eq!(changes.min_partner_cost, Some(Decimal::new(155, 1)));
        assert!(changes.name.is_none());
        assert!(changes.product_type_id.is_none());
        assert!(!changes.is_empty());
        assert!(ProductChanges::default().is_empty());
    }
}
