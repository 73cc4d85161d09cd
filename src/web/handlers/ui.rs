use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::results::columns::COLUMNS;
use crate::session::PageDirection;
use crate::web::state::AppState;
use crate::web::templates::render_template;

pub const SAMPLE_QUESTIONS: [&str; 4] = [
    "How many people earned over 1 million euros in 2023?",
    "What was the average income in Central Finland?",
    "Show me how many high-earners in each region?",
    "In what Region do most high-earners live?",
];

#[derive(Debug, Serialize)]
struct Stage {
    title: &'static str,
    description: &'static str,
}

const STAGES: [Stage; 3] = [
    Stage {
        title: "Stage 1: Getting data, based on user question (Completed)",
        description: "You can ask any question. AI will understand it, generate an SQL query, \
                      retrieve data from the database, and present it in table format.",
    },
    Stage {
        title: "Stage 2: Manipulating data with AI (Waiting for my spare time)",
        description: "Not only retrieve data but also group it and calculate specific values, \
                      by recursively sending requests to different agents and the database.",
    },
    Stage {
        title: "Stage 3: Enriching query data from the Internet (Waiting for my spare time)",
        description: "Integration with external data sources through APIs and web scraping, \
                      so answers can include current information from the internet.",
    },
];

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub question: String,
}

// Main UI entry point
pub async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    let view = session.view(state.config.display.max_columns);

    let ctx = context! {
        stages => STAGES,
        sample_questions => SAMPLE_QUESTIONS,
        columns => &COLUMNS[..],
        question => view.as_ref().and_then(|v| v.question.clone()),
        view => view,
        page => session.page(),
        error => session.last_error(),
        query_pending => session.is_query_pending(),
        page_pending => session.is_page_pending(),
    };

    Html(render_template(&state.template_env, "index.html", ctx))
}

pub async fn ask_form(State(state): State<Arc<AppState>>, Form(form): Form<AskForm>) -> Redirect {
    info!("Question submitted: {}", form.question);
    if let Err(e) = state.ask(&form.question).await {
        state.session.write().await.note_error(e.to_string());
    }
    Redirect::to("/#results")
}

pub async fn page_form(
    State(state): State<Arc<AppState>>,
    Path(direction): Path<String>,
) -> Response {
    let direction = match direction.parse::<PageDirection>() {
        Ok(direction) => direction,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };

    if let Err(e) = state.change_page(direction).await {
        state.session.write().await.note_error(e.to_string());
    }
    Redirect::to("/#results").into_response()
}
