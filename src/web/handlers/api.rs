use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::query::models::QueryRequest;
use crate::query::QueryError;
use crate::results::columns::{ColumnDescriptor, COLUMNS};
use crate::results::table::TableView;
use crate::session::PageDirection;
use crate::web::handlers::error_status;
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub direction: PageDirection,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub page: u64,
    pub view: Option<TableView>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub generation: u64,
    pub page: u64,
    pub query_pending: bool,
    pub page_pending: bool,
    pub last_error: Option<String>,
}

fn reject(e: QueryError) -> (StatusCode, String) {
    let status = error_status(&e);
    if status.is_server_error() {
        error!("Query flow failed: {}", e);
    }
    (status, e.to_string())
}

async fn snapshot(state: &AppState) -> ResultsResponse {
    let session = state.session.read().await;
    ResultsResponse {
        page: session.page(),
        view: session.view(state.config.display.max_columns),
    }
}

// Natural language query
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<ResultsResponse>, (StatusCode, String)> {
    info!("API query: {}", payload.query);
    state.ask(&payload.query).await.map_err(reject)?;
    Ok(Json(snapshot(&state).await))
}

// Next / previous page of the current result
pub async fn page(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PageRequest>,
) -> Result<Json<ResultsResponse>, (StatusCode, String)> {
    state.change_page(payload.direction).await.map_err(reject)?;
    Ok(Json(snapshot(&state).await))
}

pub async fn results(State(state): State<Arc<AppState>>) -> Json<ResultsResponse> {
    Json(snapshot(&state).await)
}

pub async fn columns() -> Json<&'static [ColumnDescriptor]> {
    Json(&COLUMNS[..])
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let session = state.session.read().await;
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (chrono::Utc::now() - state.startup_time).num_seconds(),
        generation: session.generation(),
        page: session.page(),
        query_pending: session.is_query_pending(),
        page_pending: session.is_page_pending(),
        last_error: session.last_error().map(str::to_string),
    })
}
