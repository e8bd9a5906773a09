//! Shared test utilities for the catalog.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{material_type, product, product_type},
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::logging::init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Reference rows a product needs.
pub struct References {
    /// Product type with coefficient 2.0
    pub product_type: entities::product_type::Model,
    /// Material type with 10% loss
    pub material_type: entities::material_type::Model,
}

/// Creates a product type with a custom coefficient.
pub async fn create_test_product_type(
    db: &DatabaseConnection,
    name: &str,
    coefficient: Decimal,
) -> Result<entities::product_type::Model> {
    product_type::create_product_type(db, name, coefficient).await
}

/// Creates a material type with a custom loss fraction.
pub async fn create_test_material_type(
    db: &DatabaseConnection,
    name: &str,
    loss_percent: Decimal,
) -> Result<entities::material_type::Model> {
    material_type::create_material_type(db, name, loss_percent).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `article`: `"ART-<name>"`
/// * `min_partner_cost`: 1000.00
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    refs: &References,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        product::NewProduct {
            name: name.to_string(),
            article: format!("ART-{name}"),
            min_partner_cost: Decimal::new(100_000, 2),
            product_type_id: refs.product_type.id,
            material_type_id: refs.material_type.id,
        },
    )
    .await
}

/// Sets up a database with one product type and one material type.
pub async fn setup_with_references() -> Result<(DatabaseConnection, References)> {
    let db = setup_test_db().await?;
    let refs = References {
        product_type: create_test_product_type(&db, "Кресла", Decimal::TWO).await?,
        material_type: create_test_material_type(&db, "Массив дерева", Decimal::new(1, 1))
            .await?,
    };
    Ok((db, refs))
}

/// Sets up a complete test environment with one product.
pub async fn setup_with_product() -> Result<(DatabaseConnection, entities::product::Model)> {
    let (db, refs) = setup_with_references().await?;
    let product = create_test_product(&db, "Кресло офисное", &refs).await?;
    Ok((db, product))
}
