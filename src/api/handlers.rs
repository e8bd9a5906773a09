//! Route handlers. Each one is a thin adapter over a `core` function.

use super::{
    AppState,
    extract::{JsonBody, PathParam},
};
use crate::{
    core::{
        calculation::{self, TotalTime},
        material_type, product,
        product::{NewProduct, ProductChanges},
        product_type,
        workshop::{self, ProductWorkshopRow},
    },
    entities::{
        material_type as material_entity, product as product_entity,
        product_type as product_type_entity, workshop as workshop_entity,
    },
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Input of the material calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaterialCalcRequest {
    /// Product type whose coefficient applies
    pub product_type_id: i64,
    /// Material type whose loss applies
    pub material_type_id: i64,
    /// Number of products, must be positive
    pub count: i64,
}

/// Result of the material calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCalcResponse {
    /// Whole units of raw material to order
    pub required_amount: i64,
}

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Furniture catalog API is running" }))
}

/// `GET /products`
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<product_entity::Model>>> {
    Ok(Json(product::list_products(&state.db).await?))
}

/// `GET /products/{product_id}`
pub async fn get_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
) -> Result<Json<product_entity::Model>> {
    Ok(Json(product::get_product(&state.db, product_id).await?))
}

/// `POST /products`
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewProduct>,
) -> Result<(StatusCode, Json<product_entity::Model>)> {
    let created = product::create_product(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /products/{product_id}`, applying only the supplied fields.
pub async fn update_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
    JsonBody(changes): JsonBody<ProductChanges>,
) -> Result<Json<product_entity::Model>> {
    Ok(Json(
        product::update_product(&state.db, product_id, changes).await?,
    ))
}

/// `GET /products/{product_id}/workshops`
pub async fn workshops_for_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
) -> Result<Json<Vec<ProductWorkshopRow>>> {
    Ok(Json(
        workshop::workshops_for_product(&state.db, product_id).await?,
    ))
}

/// `GET /products/{product_id}/total-time`
pub async fn product_total_time(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
) -> Result<Json<TotalTime>> {
    Ok(Json(calculation::total_time(&state.db, product_id).await?))
}

/// `GET /workshops`
pub async fn list_workshops(
    State(state): State<AppState>,
) -> Result<Json<Vec<workshop_entity::Model>>> {
    Ok(Json(workshop::list_workshops(&state.db).await?))
}

/// `GET /product-types`
pub async fn list_product_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<product_type_entity::Model>>> {
    Ok(Json(product_type::list_product_types(&state.db).await?))
}

/// `GET /material-types`
pub async fn list_material_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<material_entity::Model>>> {
    Ok(Json(material_type::list_material_types(&state.db).await?))
}

/// `POST /materials/calc`
pub async fn materials_calc(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<MaterialCalcRequest>,
) -> Result<Json<MaterialCalcResponse>> {
    let required_amount = calculation::required_material(
        &state.db,
        payload.product_type_id,
        payload.material_type_id,
        payload.count,
    )
    .await?;
    Ok(Json(MaterialCalcResponse { required_amount }))
}
