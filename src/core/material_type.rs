//! Material type business logic.

use crate::{
    entities::{MaterialType, material_type},
    errors::{Error, Result, WriteTarget},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves all material types ordered by id.
pub async fn list_material_types(db: &DatabaseConnection) -> Result<Vec<material_type::Model>> {
    MaterialType::find()
        .order_by_asc(material_type::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a material type by id, returning None if it does not exist.
pub async fn get_material_type_by_id<C>(
    db: &C,
    material_type_id: i64,
) -> Result<Option<material_type::Model>>
where
    C: ConnectionTrait,
{
    MaterialType::find_by_id(material_type_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a material type. `loss_percent` is a fraction: 0.05 means 5% wastage.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only (`InvalidArgument`)
/// - The loss percent is negative (`InvalidArgument`)
/// - Another material type already has this name (`UniquenessViolation`)
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_material_type(
    db: &DatabaseConnection,
    name: &str,
    loss_percent: Decimal,
) -> Result<material_type::Model> {
    let name = super::required_text("material type name", name)?;
    if loss_percent < Decimal::ZERO {
        return Err(Error::invalid(format!(
            "loss percent must not be negative, got {loss_percent}"
        )));
    }

    let taken = MaterialType::find()
        .filter(material_type::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::UniquenessViolation {
            entity: "material_type",
            field: "name",
            value: name,
        });
    }

    let model = material_type::ActiveModel {
        name: Set(name.clone()),
        loss_percent: Set(loss_percent.round_dp(material_type::LOSS_PERCENT_SCALE)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| {
        Error::from_write(
            e,
            &WriteTarget {
                entity: "material_type",
                unique: &[("name", name.as_str())],
                references: &[],
            },
        )
    })?;

    info!(id = model.id, "Material type created");
    Ok(model)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_material_type_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let material = create_material_type(&db, "Ламинированное ДСП", Decimal::new(7, 3)).await?;
        assert_eq!(material.name, "Ламинированное ДСП");
        assert_eq!(material.loss_percent, Decimal::new(7, 3));

        let found = get_material_type_by_id(&db, material.id).await?.unwrap();
        assert_eq!(found, material);
        assert_eq!(list_material_types(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_material_type_rejects_negative_loss() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_material_type(&db, "МДФ", Decimal::new(-5, 2)).await;
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        assert!(list_material_types(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_material_type_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_material_type(&db, "МДФ", Decimal::ZERO).await?;
        let result = create_material_type(&db, "МДФ", Decimal::ONE).await;
        assert!(matches!(result, Err(Error::UniquenessViolation { .. })));
        Ok(())
    }
}
