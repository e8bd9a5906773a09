//! Entity module - Contains all SeaORM entity definitions for the catalog.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod material_type;
pub mod product;
pub mod product_type;
pub mod product_workshop;
pub mod workshop;

// Re-export specific types to avoid conflicts
pub use material_type::{
    Column as MaterialTypeColumn, Entity as MaterialType, Model as MaterialTypeModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_type::{
    Column as ProductTypeColumn, Entity as ProductType, Model as ProductTypeModel,
};
pub use product_workshop::{
    Column as ProductWorkshopColumn, Entity as ProductWorkshop, Model as ProductWorkshopModel,
};
pub use workshop::{Column as WorkshopColumn, Entity as Workshop, Model as WorkshopModel};
