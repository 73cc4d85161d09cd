use clap::Parser;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use reach_finns::config::{AppConfig, CliArgs, Command};
use reach_finns::convert::convert_file;
use reach_finns::query::QueryManager;
use reach_finns::session::{self, PageDirection, ResultSession};
use reach_finns::util::logging::init_tracing;
use reach_finns::web;
use reach_finns::web::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_tracing(args.log_json);

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Ask {
            question,
            page,
            max_columns,
        } => ask(config, &question, page, max_columns).await,
        Command::Convert { input, output } => {
            convert_file(&input, &output)?;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Initializing query services");
    let query_manager = QueryManager::new(&config)?;

    let app_state = Arc::new(AppState::new(config.clone(), query_manager)?);

    // Start the web server
    info!("Starting Reach Finns server on {}:{}", config.web.host, config.web.port);
    match web::run_server(config.web, app_state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

async fn ask(
    config: AppConfig,
    question: &str,
    page: u64,
    max_columns: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = QueryManager::new(&config)?;
    let session = RwLock::new(ResultSession::new());

    session::run_query(&manager, &session, question).await?;
    while session.read().await.page() < page {
        session::change_page(&manager, &session, PageDirection::Next).await?;
    }

    let max_columns = max_columns.or(config.display.max_columns);
    if let Some(view) = session.read().await.view(max_columns) {
        print!("{}", view.to_text());
    }
    Ok(())
}
