//! Product CRUD handlers for the REST API.
//!
//! Every write goes through the embedding hooks, so a successful response
//! means the product is already searchable.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use ragdesk_types::record::Product;

use super::parse_id;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
}

impl UpdateProductRequest {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
    }
}

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let start = Instant::now();
    let products = state.products.list().await?;
    Ok(Json(
        ApiResponse::success(products, uuid::Uuid::now_v7().to_string(), start)
            .with_link("self", "/api/v1/products"),
    ))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let start = Instant::now();
    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();

    let product = state
        .products
        .create(Product::new(body.name, body.price, body.quantity), &ctx)
        .await?;
    let link = format!("/api/v1/products/{}", product.id);
    Ok(Json(
        ApiResponse::success(product, ctx.request_id.to_string(), start).with_link("self", &link),
    ))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let product = state
        .products
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product not found: {id}")))?;
    Ok(Json(
        ApiResponse::success(product, uuid::Uuid::now_v7().to_string(), start)
            .with_link("self", &format!("/api/v1/products/{id}")),
    ))
}

/// PUT /api/v1/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();

    let product = state
        .products
        .update(&id, |p| body.apply(p), &ctx)
        .await?;
    Ok(Json(ApiResponse::success(
        product,
        ctx.request_id.to_string(),
        start,
    )))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let ctx = state.request_context();

    if !state.products.delete(&id, &ctx).await? {
        return Err(AppError::NotFound(format!("product not found: {id}")));
    }
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "id": id, "deleted": true }),
        ctx.request_id.to_string(),
        start,
    )))
}

/// POST /api/v1/products/{id}/embedding - Regenerate one product's embedding.
pub async fn reembed_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();

    let product = state
        .products
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product not found: {id}")))?;
    state.products.pipeline().on_update(&product, &ctx).await?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({
            "id": id,
            "embedding_model": state.embedder.model_name(),
        }),
        ctx.request_id.to_string(),
        start,
    )))
}
