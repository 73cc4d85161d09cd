use async_trait::async_trait;
use reach_finns::query::cursor::PageCursor;
use reach_finns::query::models::{Field, PaginationState, QueryResult, Row};
use reach_finns::query::{QueryError, QueryService};
use std::sync::Arc;
use tokio::sync::Notify;

pub const TOTAL: u64 = 45;

/// Canned query service: 45 people, 20 per page.
///
/// "offline" questions fail in transport, "weather" questions come back
/// unanswered and "slow" questions wait until `gate` is notified.
#[derive(Default)]
pub struct StubQueryService {
    pub gate: Arc<Notify>,
}

pub fn person(index: u64) -> Row {
    Row::new()
        .with(Field::Name, format!("Person {}", index + 1))
        .with(Field::EarningsTotal, 1_000_000 - index * 1000)
        .with(Field::TaxRate, 0.32)
        .with(Field::Rank, index + 1)
}

#[async_trait]
impl QueryService for StubQueryService {
    async fn ask(&self, question: &str) -> Result<QueryResult, QueryError> {
        if question.contains("offline") {
            return Err(QueryError::Connection("connection refused".to_string()));
        }
        if question.contains("slow") {
            self.gate.notified().await;
        }
        if question.contains("weather") {
            return Ok(QueryResult {
                status: Some("failed".to_string()),
                error: Some("Only questions about high-earners are supported".to_string()),
                original_query: Some(question.to_string()),
                ..Default::default()
            });
        }

        Ok(QueryResult {
            results: (0..20).map(person).collect(),
            count: Some(TOTAL),
            pagination: Some(PaginationState::for_page(1, 20, TOTAL)),
            original_query: Some(question.to_string()),
            generated_query: Some("/people?order=earnings_total.desc&limit=20".to_string()),
            status: Some("completed".to_string()),
            ..Default::default()
        })
    }

    async fn fetch_page(&self, cursor: &PageCursor, page: u64) -> Result<Vec<Row>, QueryError> {
        let start = cursor.offset_for(page);
        let end = (start + cursor.limit).min(TOTAL);
        Ok((start..end).map(person).collect())
    }
}
