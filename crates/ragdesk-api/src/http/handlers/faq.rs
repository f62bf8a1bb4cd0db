//! FAQ CRUD handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use ragdesk_types::record::Faq;

use super::parse_id;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFaqRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

impl UpdateFaqRequest {
    fn apply(self, faq: &mut Faq) {
        if let Some(question) = self.question {
            faq.question = question;
        }
        if let Some(answer) = self.answer {
            faq.answer = answer;
        }
    }
}

/// GET /api/v1/faqs
pub async fn list_faqs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Faq>>>, AppError> {
    let start = Instant::now();
    let faqs = state.faqs.list().await?;
    Ok(Json(
        ApiResponse::success(faqs, uuid::Uuid::now_v7().to_string(), start)
            .with_link("self", "/api/v1/faqs")
            .with_link("ask", "/api/v1/faqs/ask"),
    ))
}

/// POST /api/v1/faqs
pub async fn create_faq(
    State(state): State<AppState>,
    Json(body): Json<CreateFaqRequest>,
) -> Result<Json<ApiResponse<Faq>>, AppError> {
    let start = Instant::now();
    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();

    let faq = state
        .faqs
        .create(Faq::new(body.question, body.answer), &ctx)
        .await?;
    let link = format!("/api/v1/faqs/{}", faq.id);
    Ok(Json(
        ApiResponse::success(faq, ctx.request_id.to_string(), start).with_link("self", &link),
    ))
}

/// GET /api/v1/faqs/{id}
pub async fn get_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Faq>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let faq = state
        .faqs
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("faq not found: {id}")))?;
    Ok(Json(ApiResponse::success(
        faq,
        uuid::Uuid::now_v7().to_string(),
        start,
    )))
}

/// PUT /api/v1/faqs/{id}
pub async fn update_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateFaqRequest>,
) -> Result<Json<ApiResponse<Faq>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let ctx = state.request_context();
    let _guard = ctx.cancellation.clone().drop_guard();

    let faq = state.faqs.update(&id, |f| body.apply(f), &ctx).await?;
    Ok(Json(ApiResponse::success(
        faq,
        ctx.request_id.to_string(),
        start,
    )))
}

/// DELETE /api/v1/faqs/{id}
pub async fn delete_faq(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = parse_id(&id)?;
    let ctx = state.request_context();

    if !state.faqs.delete(&id, &ctx).await? {
        return Err(AppError::NotFound(format!("faq not found: {id}")));
    }
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "id": id, "deleted": true }),
        ctx.request_id.to_string(),
        start,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_answer_only() {
        let mut faq = Faq::new("Do you ship internationally?", "No.");
        let body: UpdateFaqRequest =
            serde_json::from_str(r#"{"answer": "Yes, to many countries."}"#).unwrap();
        body.apply(&mut faq);
        assert_eq!(faq.question, "Do you ship internationally?");
        assert_eq!(faq.answer, "Yes, to many countries.");
    }
}
