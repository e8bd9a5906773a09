//! Product type entity - A category of product with its material coefficient.
//!
//! The coefficient is the amount of raw material consumed per unit of product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Decimal places kept for `coefficient`.
pub const COEFFICIENT_SCALE: u32 = 2;

/// Product type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_types")]
pub struct Model {
    /// Unique identifier for the product type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product type (e.g., "Кресла")
    #[sea_orm(unique)]
    pub name: String,
    /// Material units per unit of product. SQLite has no decimal column, so this
    /// is stored as REAL and rounded back to [`COEFFICIENT_SCALE`] on use.
    #[sea_orm(column_type = "Double")]
    pub coefficient: Decimal,
}

/// Defines relationships between `ProductType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product type has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
