//! Semantic search handlers: ranked records without an answer.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};

use ragdesk_types::record::{Faq, Product, RankedRecord};

use super::{SearchQuery, require_text};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/products/search?q=&top_n=
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<RankedRecord<Product>>>>, AppError> {
    let start = Instant::now();
    let text = require_text(&query.q, "q")?;
    let top_n = query.top_n.unwrap_or(state.config.retrieval.search_top_n);

    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();
    let ranked = state.product_search.retrieve_ranked(text, top_n, &ctx).await?;

    Ok(Json(ApiResponse::success(
        ranked,
        ctx.request_id.to_string(),
        start,
    )))
}

/// GET /api/v1/faqs/search?q=&top_n=
pub async fn search_faqs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<RankedRecord<Faq>>>>, AppError> {
    let start = Instant::now();
    let text = require_text(&query.q, "q")?;
    let top_n = query.top_n.unwrap_or(state.config.retrieval.search_top_n);

    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();
    let ranked = state.faq_search.retrieve_ranked(text, top_n, &ctx).await?;

    Ok(Json(ApiResponse::success(
        ranked,
        ctx.request_id.to_string(),
        start,
    )))
}
