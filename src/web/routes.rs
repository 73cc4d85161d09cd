use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::static_files::static_handler;
use super::state::AppState;

// UI Routes - web interface
pub fn ui_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::ui::index_handler))
        .route("/ask", post(handlers::ui::ask_form))
        .route("/page/{direction}", post(handlers::ui::page_form))
        .route("/static/{*path}", get(static_handler))
}

// API Routes - REST API for programmatic access
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().nest(
        "/api",
        Router::new()
            // Query endpoints
            .route("/query", post(handlers::api::query))
            .route("/page", post(handlers::api::page))
            .route("/results", get(handlers::api::results))

            // Display configuration
            .route("/columns", get(handlers::api::columns))

            // System status
            .route("/status", get(handlers::api::system_status)),
    )
}
