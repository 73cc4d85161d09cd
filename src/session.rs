use crate::query::cursor::{PageCursor, DEFAULT_PAGE_LIMIT};
use crate::query::models::{QueryResult, Row};
use crate::query::{QueryError, QueryManager};
use crate::results::pagination::{initial_pagination, reconcile};
use crate::results::table::TableView;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    Next,
    Previous,
}

impl FromStr for PageDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "next" => Ok(PageDirection::Next),
            "previous" | "prev" => Ok(PageDirection::Previous),
            other => Err(format!("Unknown page direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AskTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    pub page: u64,
    pub cursor: PageCursor,
}

/// View-state of the results panel.
///
/// Every top-level question bumps `generation`; responses carrying an
/// older generation are dropped instead of overwriting newer results.
#[derive(Debug, Default)]
pub struct ResultSession {
    result: Option<QueryResult>,
    cursor: Option<PageCursor>,
    page: u64,
    generation: u64,
    last_error: Option<String>,
    query_pending: bool,
    page_pending: bool,
}

impl ResultSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_query_pending(&self) -> bool {
        self.query_pending
    }

    pub fn is_page_pending(&self) -> bool {
        self.page_pending
    }

    /// Records a failure for display, e.g. a rejected empty question.
    pub fn note_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    fn page_size(&self) -> u64 {
        self.cursor.as_ref().map(|c| c.limit).unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    pub fn view(&self, max_columns: Option<usize>) -> Option<TableView> {
        self.result
            .as_ref()
            .map(|r| TableView::build(r, max_columns, self.page_size()))
    }

    /// Validates the question and opens a new generation for it.
    pub fn begin_ask(&mut self, question: &str) -> Result<AskTicket, QueryError> {
        if question.trim().is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        self.generation += 1;
        self.query_pending = true;
        self.page_pending = false;
        self.last_error = None;

        Ok(AskTicket {
            generation: self.generation,
        })
    }

    pub fn finish_ask(
        &mut self,
        ticket: AskTicket,
        outcome: Result<QueryResult, QueryError>,
    ) -> Result<(), QueryError> {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale query response (generation {} < {})",
                ticket.generation, self.generation
            );
            return Ok(());
        }
        self.query_pending = false;

        match outcome {
            Ok(result) => {
                if let Some(message) = result.failure_message() {
                    info!("Query service could not answer the question: {}", message);
                }
                self.cursor = result.generated_query.as_deref().and_then(PageCursor::from_token);
                self.page = 1;
                self.result = Some(result);
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Starts a next/previous page fetch, gated on the current window.
    pub fn begin_page(&mut self, direction: PageDirection) -> Result<PageTicket, QueryError> {
        let (Some(result), Some(cursor)) = (&self.result, &self.cursor) else {
            return Err(QueryError::NoActiveQuery);
        };
        // the displayed result is about to be replaced
        if self.query_pending {
            return Err(QueryError::QueryPending);
        }
        if self.page_pending {
            return Err(QueryError::PagePending);
        }

        let pagination = initial_pagination(result, cursor.limit);
        let target = match direction {
            PageDirection::Next if pagination.has_next_page => self.page + 1,
            PageDirection::Previous if pagination.has_previous_page => self.page.saturating_sub(1).max(1),
            PageDirection::Next => return Err(QueryError::PageUnavailable(self.page + 1)),
            PageDirection::Previous => {
                return Err(QueryError::PageUnavailable(self.page.saturating_sub(1)));
            }
        };

        let ticket = PageTicket {
            generation: self.generation,
            page: target,
            cursor: cursor.clone(),
        };
        self.page_pending = true;
        self.last_error = None;
        Ok(ticket)
    }

    pub fn finish_page(
        &mut self,
        ticket: PageTicket,
        outcome: Result<Vec<Row>, QueryError>,
    ) -> Result<(), QueryError> {
        if ticket.generation != self.generation || self.cursor.as_ref() != Some(&ticket.cursor) {
            debug!(
                "Dropping stale page {} response (generation {}, current {})",
                ticket.page, ticket.generation, self.generation
            );
            return Ok(());
        }
        self.page_pending = false;

        match outcome {
            Ok(rows) => {
                let page_size = self.page_size();
                if let Some(previous) = &self.result {
                    self.result = Some(reconcile(previous, rows, ticket.page, page_size));
                    self.page = ticket.page;
                }
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Runs a top-level question. The session lock is not held while the request is in flight.
pub async fn run_query(
    manager: &QueryManager,
    session: &RwLock<ResultSession>,
    question: &str,
) -> Result<(), QueryError> {
    let question = question.trim();
    let ticket = session.write().await.begin_ask(question)?;

    let outcome = manager.ask(question).await;
    if let Err(e) = &outcome {
        error!("Query failed: {}", e);
    }

    session.write().await.finish_ask(ticket, outcome)
}

/// Fetches the next or previous page of the current result.
pub async fn change_page(
    manager: &QueryManager,
    session: &RwLock<ResultSession>,
    direction: PageDirection,
) -> Result<(), QueryError> {
    let ticket = session.write().await.begin_page(direction)?;

    let outcome = manager.fetch_page(&ticket.cursor, ticket.page).await;
    if let Err(e) = &outcome {
        error!("Pagination error: {}", e);
    }

    session.write().await.finish_page(ticket, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::models::{Field, PaginationState};

    fn first_page(total: u64) -> QueryResult {
        QueryResult {
            results: vec![Row::new().with(Field::Name, "Matti")],
            total_count: Some(total),
            pagination: Some(PaginationState::for_page(1, 20, total)),
            original_query: Some("Who earns the most?".to_string()),
            generated_query: Some("/people?limit=20".to_string()),
            status: Some("completed".to_string()),
            ..Default::default()
        }
    }

    fn answered(total: u64) -> ResultSession {
        let mut session = ResultSession::new();
        let ticket = session.begin_ask("Who earns the most?").unwrap();
        session.finish_ask(ticket, Ok(first_page(total))).unwrap();
        session
    }

    #[test]
    fn empty_question_is_rejected_before_request() {
        let mut session = ResultSession::new();
        assert!(matches!(session.begin_ask("   "), Err(QueryError::EmptyQuestion)));
        assert_eq!(session.generation(), 0);
        assert!(!session.is_query_pending());
    }

    #[test]
    fn answer_sets_first_page_and_cursor() {
        let session = answered(45);
        assert_eq!(session.page(), 1);
        assert_eq!(session.cursor().map(|c| c.limit), Some(20));
        assert!(!session.is_query_pending());
    }

    #[test]
    fn paging_forward_and_back() {
        let mut session = answered(45);

        let ticket = session.begin_page(PageDirection::Next).unwrap();
        assert_eq!(ticket.page, 2);
        assert!(session.is_page_pending());
        session
            .finish_page(ticket, Ok(vec![Row::new().with(Field::Name, "Liisa")]))
            .unwrap();

        assert_eq!(session.page(), 2);
        let pagination = session.result().unwrap().pagination.unwrap();
        assert_eq!(pagination.start_index, 20);
        assert!(pagination.has_previous_page);

        let ticket = session.begin_page(PageDirection::Previous).unwrap();
        assert_eq!(ticket.page, 1);
    }

    #[test]
    fn cannot_page_past_the_end() {
        let mut session = answered(15);
        assert!(matches!(
            session.begin_page(PageDirection::Next),
            Err(QueryError::PageUnavailable(2))
        ));
        assert!(matches!(
            session.begin_page(PageDirection::Previous),
            Err(QueryError::PageUnavailable(0))
        ));
    }

    #[test]
    fn paging_without_query_is_refused() {
        let mut session = ResultSession::new();
        assert!(matches!(
            session.begin_page(PageDirection::Next),
            Err(QueryError::NoActiveQuery)
        ));
    }

    #[test]
    fn failed_page_keeps_previous_result() {
        let mut session = answered(45);
        let before = session.result().cloned();

        let ticket = session.begin_page(PageDirection::Next).unwrap();
        let err = session.finish_page(ticket, Err(QueryError::Status(500)));

        assert!(err.is_err());
        assert_eq!(session.result().cloned(), before);
        assert_eq!(session.page(), 1);
        assert!(!session.is_page_pending());
        assert!(session.last_error().is_some());
    }

    #[test]
    fn stale_page_response_is_dropped() {
        let mut session = answered(45);
        let stale = session.begin_page(PageDirection::Next).unwrap();

        let ticket = session.begin_ask("Who lives in Lapland?").unwrap();
        let mut lapland = first_page(3);
        lapland.original_query = Some("Who lives in Lapland?".to_string());
        session.finish_ask(ticket, Ok(lapland.clone())).unwrap();

        session
            .finish_page(stale, Ok(vec![Row::new().with(Field::Name, "Stale")]))
            .unwrap();

        assert_eq!(session.result(), Some(&lapland));
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn paging_is_refused_while_a_new_question_is_pending() {
        let mut session = answered(45);
        let ticket = session.begin_ask("new").unwrap();

        assert!(matches!(
            session.begin_page(PageDirection::Next),
            Err(QueryError::QueryPending)
        ));

        let mut small = first_page(3);
        small.original_query = Some("new".to_string());
        session.finish_ask(ticket, Ok(small.clone())).unwrap();

        assert_eq!(session.result(), Some(&small));
        assert_eq!(session.page(), 1);
        assert!(!session.is_page_pending());
    }

    #[test]
    fn page_for_a_replaced_cursor_is_dropped() {
        let mut session = answered(45);
        let page_ticket = session.begin_page(PageDirection::Next).unwrap();

        // same generation, but the result now pages a different query
        session.cursor = PageCursor::from_token("/people?living_province=eq.Lappi&limit=20");
        session
            .finish_page(page_ticket, Ok(vec![Row::new().with(Field::Name, "Old page 2")]))
            .unwrap();

        assert_eq!(session.page(), 1);
        assert_eq!(session.result().unwrap().results[0].get(Field::Name).as_str(), Some("Matti"));
    }

    #[test]
    fn stale_answer_is_dropped() {
        let mut session = ResultSession::new();
        let old = session.begin_ask("first").unwrap();
        let new = session.begin_ask("second").unwrap();

        session.finish_ask(new, Ok(first_page(45))).unwrap();
        session.finish_ask(old, Ok(first_page(3))).unwrap();

        assert_eq!(session.result().unwrap().total(), 45);
    }

    #[test]
    fn backend_error_is_kept_as_message() {
        let mut session = ResultSession::new();
        let ticket = session.begin_ask("What is the meaning of life?").unwrap();
        let result = QueryResult {
            error: Some("This question is not about the dataset".to_string()),
            status: Some("failed".to_string()),
            ..Default::default()
        };
        session.finish_ask(ticket, Ok(result)).unwrap();

        let view = session.view(None).unwrap();
        assert_eq!(
            view.message.as_deref(),
            Some("This question is not about the dataset")
        );
        assert!(session.last_error().is_none());
    }

    #[test]
    fn direction_parses() {
        assert_eq!("next".parse::<PageDirection>(), Ok(PageDirection::Next));
        assert_eq!("Previous".parse::<PageDirection>(), Ok(PageDirection::Previous));
        assert!("jump".parse::<PageDirection>().is_err());
    }
}
