//! Workshop entity - A production station products pass through.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workshop database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workshops")]
pub struct Model {
    /// Unique identifier for the workshop
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the workshop (e.g., "Сушильный")
    #[sea_orm(unique)]
    pub name: String,
    /// Free-text category (e.g., "Обработка")
    pub workshop_type: String,
    /// Number of people needed to run the workshop, always positive
    pub people_count: i32,
}

/// Defines relationships between Workshop and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One workshop has many product timings
    #[sea_orm(has_many = "super::product_workshop::Entity")]
    ProductWorkshops,
}

impl Related<super::product_workshop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductWorkshops.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_workshop::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_workshop::Relation::Workshop.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
