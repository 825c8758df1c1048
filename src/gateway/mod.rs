//! HTTP gateway (Axum) for fact-check requests.
//!
//! This module is primarily used by the `claimcheck` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{classify_handler, search_check_handler, texts_check_handler};
pub use state::{AppState, CheckerFactory};

pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/fact-check/search", post(search_check_handler))
        .route("/fact-check/texts", post(texts_check_handler))
        .route("/fact-check/classify", post(classify_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "healthy" })).into_response()
}
