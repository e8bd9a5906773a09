//! Product-workshop association - how long a product spends in a workshop.
//!
//! Keyed by the `(product_id, workshop_id)` pair, so each product has at most
//! one timing per workshop.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product-workshop database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_workshops")]
pub struct Model {
    /// ID of the product
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
    /// ID of the workshop
    #[sea_orm(primary_key, auto_increment = false)]
    pub workshop_id: i64,
    /// Manufacturing time in this workshop, in whole minutes
    pub time_minutes: i32,
}

/// Defines relationships between `ProductWorkshop` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each row belongs to one workshop
    #[sea_orm(
        belongs_to = "super::workshop::Entity",
        from = "Column::WorkshopId",
        to = "super::workshop::Column::Id"
    )]
    Workshop,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::workshop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workshop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
