use crate::query::QueryError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u64 = 20;

// Only used to let `Url` split a relative token into path and query pairs
const TOKEN_BASE: &str = "http://cursor.local/";

/// Typed pagination cursor for the REST backend.
///
/// Built once from the `generatedQuery` token returned with a top-level
/// result, then reused verbatim for every page fetch of that result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub path: String,
    pub base_params: Vec<(String, String)>,
    pub limit: u64,
}

impl PageCursor {
    /// Parses a `generatedQuery` token such as `/people?select=*&limit=20`.
    ///
    /// Returns `None` for an empty token. A missing, zero or non-numeric
    /// `limit` falls back to [`DEFAULT_PAGE_LIMIT`]; any `offset` already in
    /// the token is dropped since it is recomputed per page.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().trim_matches('"').trim();
        if token.is_empty() {
            return None;
        }

        let (path, query) = match token.split_once('?') {
            Some((path, query)) => (path, query),
            None => (token, ""),
        };

        let mut limit = DEFAULT_PAGE_LIMIT;
        let mut base_params = Vec::new();

        if !query.is_empty() {
            let url = Url::parse(TOKEN_BASE).ok()?.join(&format!("?{}", query)).ok()?;
            for (key, value) in url.query_pairs() {
                match &*key {
                    "limit" => {
                        limit = value
                            .parse::<u64>()
                            .ok()
                            .filter(|l| *l > 0)
                            .unwrap_or(DEFAULT_PAGE_LIMIT);
                    }
                    "offset" => {}
                    _ => base_params.push((key.into_owned(), value.into_owned())),
                }
            }
        }

        Some(Self {
            path: path.to_string(),
            base_params,
            limit,
        })
    }

    /// Row offset of the first record on `page` (1-based).
    pub fn offset_for(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.limit
    }

    /// Query parameters for fetching `page`.
    pub fn page_params(&self, page: u64) -> Vec<(String, String)> {
        let mut params = self.base_params.clone();
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("offset".to_string(), self.offset_for(page).to_string()));
        params
    }

    /// Full request URL for `page` against the backend base URL.
    pub fn page_url(&self, base_url: &str, page: u64) -> Result<Url, QueryError> {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        Url::parse_with_params(&endpoint, self.page_params(page))
            .map_err(|e| QueryError::Config(format!("Invalid backend URL '{}': {}", endpoint, e)))
    }
}
