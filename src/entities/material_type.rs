//! Material type entity - A raw material and the fraction lost in production.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Decimal places kept for `loss_percent`.
pub const LOSS_PERCENT_SCALE: u32 = 6;

/// Material type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_types")]
pub struct Model {
    /// Unique identifier for the material type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the material (e.g., "Мебельный щит из массива дерева")
    #[sea_orm(unique)]
    pub name: String,
    /// Wastage as a fraction (0.05 = 5%), stored as REAL, see [`LOSS_PERCENT_SCALE`]
    #[sea_orm(column_type = "Double")]
    pub loss_percent: Decimal,
}

/// Defines relationships between `MaterialType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One material type is the main material of many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
