//! Catalog endpoints.
//!
//! Input is validated strictly here (name required and unique, price not
//! negative); receipts, by contrast, are sanitized leniently.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use optic_core::validation::validate_product_input;
use optic_core::{MoveDirection, Product, ProductInput};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/{id}/move", post(move_product))
}

/// Body of `POST /api/products/{id}/move`.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

/// `GET /api/products`: the whole catalog, in display order.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list().await?;
    debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload?;
    let input = validate_product_input(input)?;

    let product = state.db.products().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", &id))
}

/// `PUT /api/products/{id}`: replaces name and price.
///
/// Receipts already issued keep the name and price they were sold at.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(input) = payload?;
    let input = validate_product_input(input)?;

    let product = state.db.products().update(&id, &input).await?;
    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/products/{id}/move`: swaps the product with its neighbour.
///
/// Returns the catalog in its new order. Moving past either end is a no-op.
pub async fn move_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Json(request) = payload?;

    let products = state
        .db
        .products()
        .move_product(&id, request.direction)
        .await?;
    Ok(Json(products))
}
