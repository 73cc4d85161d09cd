pub mod api;
pub mod ui;

use crate::query::QueryError;
use axum::http::StatusCode;

/// HTTP status for a failed query flow.
pub fn error_status(error: &QueryError) -> StatusCode {
    match error {
        QueryError::EmptyQuestion => StatusCode::BAD_REQUEST,
        QueryError::NoActiveQuery
        | QueryError::PageUnavailable(_)
        | QueryError::PagePending
        | QueryError::QueryPending => StatusCode::CONFLICT,
        QueryError::Connection(_) | QueryError::Status(_) | QueryError::Response(_) => {
            StatusCode::BAD_GATEWAY
        }
        QueryError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
