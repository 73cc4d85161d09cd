use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use reach_finns::config::{BackendConfig, QueryConfig};
use reach_finns::query::cursor::PageCursor;
use reach_finns::query::models::Field;
use reach_finns::query::remote::RemoteQueryService;
use reach_finns::query::{QueryError, QueryService};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct Seen {
    params: Vec<HashMap<String, String>>,
    api_keys: Vec<String>,
}

async fn lambda(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "results": [{ "name": "Matti", "earnings_total": 150000, "internal_id": 7 }],
        "count": 45,
        "pagination": {
            "currentPageSize": 20,
            "totalCount": 45,
            "startIndex": 0,
            "endIndex": 19,
            "hasNextPage": true,
            "hasPreviousPage": false
        },
        "originalQuery": body["query"],
        "generatedQuery": "/people?select=name,earnings_total&limit=20",
        "status": "completed"
    }))
}

async fn people(
    State(seen): State<Arc<Mutex<Seen>>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut seen = seen.lock().unwrap();
    seen.api_keys.push(
        headers
            .get("apikey")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    );
    seen.params.push(params);
    Json(json!([{ "name": "Liisa", "earnings_total": 140000 }]))
}

async fn spawn_backend() -> (String, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let app = Router::new()
        .route("/query", post(lambda))
        .route("/broken", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/rest/v1/people", get(people))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}

fn service(base: &str, lambda_path: &str) -> RemoteQueryService {
    RemoteQueryService::new(
        &QueryConfig {
            lambda_url: Some(format!("{}{}", base, lambda_path)),
            timeout_secs: 5,
        },
        &BackendConfig {
            base_url: Some(format!("{}/rest/v1", base)),
            api_key: Some("anon-key".to_string()),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn asks_and_fetches_pages() {
    let (base, seen) = spawn_backend().await;
    let service = service(&base, "/query");

    let result = service.ask("Who earns the most?").await.unwrap();
    assert_eq!(result.original_query.as_deref(), Some("Who earns the most?"));
    assert_eq!(result.total(), 45);
    assert_eq!(result.results[0].fields().count(), 2);

    let cursor = PageCursor::from_token(result.generated_query.as_deref().unwrap()).unwrap();
    let rows = service.fetch_page(&cursor, 2).await.unwrap();
    assert_eq!(rows[0].get(Field::Name), &json!("Liisa"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.api_keys, vec!["anon-key".to_string()]);
    let params = &seen.params[0];
    assert_eq!(params["offset"], "20");
    assert_eq!(params["limit"], "20");
    assert_eq!(params["select"], "name,earnings_total");
}

#[tokio::test]
async fn error_status_is_reported() {
    let (base, _) = spawn_backend().await;
    let service = service(&base, "/broken");

    let err = service.ask("anything").await.unwrap_err();
    assert!(matches!(err, QueryError::Status(500)));
}

#[tokio::test]
async fn missing_urls_are_config_errors() {
    let err = RemoteQueryService::new(
        &QueryConfig {
            lambda_url: None,
            timeout_secs: 5,
        },
        &BackendConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, QueryError::Config(_)));
}
