//! Product entity - A manufactured item.
//!
//! Each product belongs to one product type and has one main material type.
//! Name and article are each globally unique. Workshops are linked through
//! `product_workshops`, which carries the manufacturing time per workshop.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Decimal places kept for `min_partner_cost`.
pub const COST_SCALE: u32 = 2;

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the product type
    pub product_type_id: i64,
    /// ID of the main material type
    pub material_type_id: i64,
    /// Name of the product
    #[sea_orm(unique)]
    pub name: String,
    /// Catalog article number
    #[sea_orm(unique)]
    pub article: String,
    /// Minimum price for partners, stored as REAL, see [`COST_SCALE`]
    #[sea_orm(column_type = "Double")]
    pub min_partner_cost: Decimal,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one product type
    #[sea_orm(
        belongs_to = "super::product_type::Entity",
        from = "Column::ProductTypeId",
        to = "super::product_type::Column::Id"
    )]
    ProductType,
    /// Each product has one main material type
    #[sea_orm(
        belongs_to = "super::material_type::Entity",
        from = "Column::MaterialTypeId",
        to = "super::material_type::Column::Id"
    )]
    MaterialType,
    /// One product passes through many workshops
    #[sea_orm(has_many = "super::product_workshop::Entity")]
    ProductWorkshops,
}

impl Related<super::product_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductType.def()
    }
}

impl Related<super::material_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialType.def()
    }
}

impl Related<super::product_workshop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductWorkshops.def()
    }
}

impl Related<super::workshop::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_workshop::Relation::Workshop.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_workshop::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
