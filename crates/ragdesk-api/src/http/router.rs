//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Question answering
        .route("/ask", get(handlers::ask::ask_products))
        .route("/faqs/ask", get(handlers::ask::ask_faqs))
        // Semantic search
        .route("/products/search", get(handlers::search::search_products))
        .route("/faqs/search", get(handlers::search::search_faqs))
        // Products
        .route(
            "/products",
            get(handlers::product::list_products).post(handlers::product::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::product::get_product)
                .put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
        .route(
            "/products/{id}/embedding",
            post(handlers::product::reembed_product),
        )
        // FAQs
        .route(
            "/faqs",
            get(handlers::faq::list_faqs).post(handlers::faq::create_faq),
        )
        .route(
            "/faqs/{id}",
            get(handlers::faq::get_faq)
                .put(handlers::faq::update_faq)
                .delete(handlers::faq::delete_faq),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check; touches no provider.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
