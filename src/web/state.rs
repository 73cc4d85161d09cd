use crate::config::AppConfig;
use crate::query::{QueryError, QueryManager};
use crate::session::{self, PageDirection, ResultSession};
use crate::web::templates::init_templates;
use minijinja::Environment;
use tokio::sync::RwLock;

/// Shared application state for the web server
pub struct AppState {
    pub config: AppConfig,
    pub template_env: Environment<'static>,
    pub query_manager: QueryManager,
    // View-state of the results panel
    pub session: RwLock<ResultSession>,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, query_manager: QueryManager) -> Result<Self, minijinja::Error> {
        Ok(Self {
            config,
            template_env: init_templates()?,
            query_manager,
            session: RwLock::new(ResultSession::new()),
            startup_time: chrono::Utc::now(),
        })
    }

    pub async fn ask(&self, question: &str) -> Result<(), QueryError> {
        session::run_query(&self.query_manager, &self.session, question).await
    }

    pub async fn change_page(&self, direction: PageDirection) -> Result<(), QueryError> {
        session::change_page(&self.query_manager, &self.session, direction).await
    }
}
