pub mod cursor;
pub mod models;
pub mod remote;

use crate::config::AppConfig;
use async_trait::async_trait;
use thiserror::Error;

use self::cursor::PageCursor;
use self::models::{QueryResult, Row};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query service connection error: {0}")]
    Connection(String),
    #[error("Query service responded with status code: {0}")]
    Status(u16),
    #[error("Query service response error: {0}")]
    Response(String),
    #[error("Question must not be empty")]
    EmptyQuestion,
    #[error("No active query to paginate")]
    NoActiveQuery,
    #[error("Page {0} is not available")]
    PageUnavailable(u64),
    #[error("A page request is already in flight")]
    PagePending,
    #[error("A new question is still being answered")]
    QueryPending,
    #[error("Query configuration error: {0}")]
    Config(String),
}

/// The two outbound request flows: the natural-language query and the page fetch.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn ask(&self, question: &str) -> Result<QueryResult, QueryError>;

    async fn fetch_page(&self, cursor: &PageCursor, page: u64) -> Result<Vec<Row>, QueryError>;
}

pub struct QueryManager {
    service: Box<dyn QueryService + Send + Sync>,
}

impl QueryManager {
    pub fn new(config: &AppConfig) -> Result<Self, QueryError> {
        let service = remote::RemoteQueryService::new(&config.query, &config.backend)?;
        Ok(Self::with_service(Box::new(service)))
    }

    pub fn with_service(service: Box<dyn QueryService + Send + Sync>) -> Self {
        Self { service }
    }

    pub async fn ask(&self, question: &str) -> Result<QueryResult, QueryError> {
        self.service.ask(question).await
    }

    pub async fn fetch_page(&self, cursor: &PageCursor, page: u64) -> Result<Vec<Row>, QueryError> {
        self.service.fetch_page(cursor, page).await
    }
}
