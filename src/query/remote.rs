use crate::config::{BackendConfig, QueryConfig};
use crate::query::cursor::PageCursor;
use crate::query::models::{QueryRequest, QueryResult, Row};
use crate::query::{QueryError, QueryService};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error, info};

/// Talks to the query lambda and the REST backend over HTTP.
pub struct RemoteQueryService {
    client: reqwest::Client,
    lambda_url: String,
    base_url: String,
    api_key: String,
}

impl RemoteQueryService {
    pub fn new(query: &QueryConfig, backend: &BackendConfig) -> Result<Self, QueryError> {
        let lambda_url = query
            .lambda_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| QueryError::Config("Query lambda URL is required".to_string()))?;

        let base_url = backend
            .base_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| QueryError::Config("Backend base URL is required".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(query.timeout_secs))
            .build()
            .map_err(|e| QueryError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            lambda_url,
            base_url,
            api_key: backend.api_key.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl QueryService for RemoteQueryService {
    async fn ask(&self, question: &str) -> Result<QueryResult, QueryError> {
        info!("Sending question to query service: {}", question);

        let request = QueryRequest {
            query: question.to_string(),
        };

        let response = self
            .client
            .post(&self.lambda_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching query results: {}", e);
                QueryError::Connection(e.to_string())
            })?;

        if !response.status().is_success() {
            error!("Query service responded with status {}", response.status());
            return Err(QueryError::Status(response.status().as_u16()));
        }

        let result: QueryResult = response.json().await.map_err(|e| {
            error!("Undecodable query service response: {}", e);
            QueryError::Response(e.to_string())
        })?;

        debug!(
            "Query service returned {} rows (total {}), status {:?}",
            result.results.len(),
            result.total(),
            result.status
        );

        Ok(result)
    }

    async fn fetch_page(&self, cursor: &PageCursor, page: u64) -> Result<Vec<Row>, QueryError> {
        let url = cursor.page_url(&self.base_url, page)?;
        info!("Fetching page {} from {}", page, url.path());

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching paginated data: {}", e);
                QueryError::Connection(e.to_string())
            })?;

        if !response.status().is_success() {
            error!("Backend responded with status {}", response.status());
            return Err(QueryError::Status(response.status().as_u16()));
        }

        let rows: Vec<Row> = response.json().await.map_err(|e| {
            error!("Undecodable page response: {}", e);
            QueryError::Response(e.to_string())
        })?;

        debug!("Page {} returned {} rows", page, rows.len());
        Ok(rows)
    }
}
