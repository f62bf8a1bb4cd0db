//! Question answering handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};

use ragdesk_core::answer::ComposedAnswer;

use super::{AskQuery, require_text};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/ask?question=&top_n= - Answer a product question.
pub async fn ask_products(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> Result<Json<ApiResponse<ComposedAnswer>>, AppError> {
    let start = Instant::now();
    let question = require_text(&query.question, "question")?;
    let top_n = query.top_n.unwrap_or(state.config.retrieval.product_top_n);

    let ctx = state.request_context();
    // A dropped connection drops this future; cancel in-flight provider calls.
    let _guard = ctx.cancellation.clone().drop_guard();

    let answer = state.composer.compose(question, top_n, &ctx).await?;
    let resp = ApiResponse::success(answer, ctx.request_id.to_string(), start)
        .with_link("search", "/api/v1/products/search");
    Ok(Json(resp))
}

/// GET /api/v1/faqs/ask?question=&top_n= - Answer from the FAQ corpus.
pub async fn ask_faqs(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> Result<Json<ApiResponse<ComposedAnswer>>, AppError> {
    let start = Instant::now();
    let question = require_text(&query.question, "question")?;
    let top_n = query.top_n.unwrap_or(state.config.retrieval.faq_top_n);

    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();

    let answer = state.faq_answerer.compose(question, top_n, &ctx).await?;
    let resp = ApiResponse::success(answer, ctx.request_id.to_string(), start)
        .with_link("search", "/api/v1/faqs/search");
    Ok(Json(resp))
}
