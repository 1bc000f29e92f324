//! HTTP router and handlers.

use crate::app::AppState;
use axum::{
    Json, Router,
    routing::{get, put},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod extract;
pub mod todos;
pub mod ui;

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::ui_index))
        .route("/health", get(health))
        .route(
            "/api/todos/",
            get(todos::list_todos).post(todos::create_todo),
        )
        .route(
            "/api/todos",
            get(todos::list_todos).post(todos::create_todo),
        )
        .route(
            "/api/todos/:id",
            put(todos::update_todo).delete(todos::delete_todo),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
