//! In-process stand-in for the Honeycomb API used by the integration tests.

#![expect(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use honeycomb_client::{Environment, HoneycombClient, PollConfig};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

pub const API_KEY: &str = "abc";
pub const DATASET: &str = "web-logs";

/// What the mock server saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<RecordedRequest>,
    polls: u32,
}

#[derive(Clone)]
pub struct MockHoneycomb {
    inner: Arc<Mutex<Inner>>,
    /// Number of polls after which the query result reports `complete`.
    complete_after: Option<u32>,
    pub addr: SocketAddr,
}

impl MockHoneycomb {
    /// Starts a server whose query result completes on poll number `complete_after`
    /// (never, if `None`).
    pub async fn start(complete_after: Option<u32>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Honeycomb listener");
        let addr = listener.local_addr().expect("listener should have an address");
        let server = Self {
            inner: Arc::default(),
            complete_after,
            addr,
        };
        let router = Router::new().fallback(handle).with_state(server.clone());
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("mock Honeycomb server failed");
        });
        server
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("mock base URL should parse")
    }

    /// A client with one environment, `prod`, pointing at this server.
    pub fn client(&self, api_key: &str) -> HoneycombClient {
        HoneycombClient::builder()
            .environment(Environment::new("prod", api_key).with_base_url(self.base_url()))
            .poll_config(PollConfig {
                max_attempts: 5,
                interval: Duration::from_millis(10),
            })
            .build()
            .expect("client should build")
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }

    pub async fn polls(&self) -> u32 {
        self.inner.lock().await.polls
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({ "error": format!("{what} not found") })),
    )
        .into_response()
}

async fn handle(
    State(server): State<MockHoneycomb>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        api_key: header(&headers, "x-honeycomb-team"),
        content_type: header(&headers, "content-type"),
        body: serde_json::from_slice(&body).ok(),
    };
    let mut inner = server.inner.lock().await;
    inner.requests.push(recorded.clone());

    if recorded.api_key.as_deref() != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({"error": "unknown API key - check your credentials"})),
        )
            .into_response();
    }

    let key_name = recorded.query.as_deref().and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "key_name")
            .map(|(_, value)| value.into_owned())
    });

    let segments: Vec<&str> = recorded.path.trim_start_matches('/').split('/').collect();
    let body = match (method, segments.as_slice()) {
        (Method::GET, ["1", "datasets"]) => json!([
            {"name": "Web Logs", "slug": DATASET},
            {"name": "Billing", "slug": "billing"}
        ]),
        (Method::GET, ["1", "datasets", DATASET]) => json!({
            "name": "Web Logs",
            "slug": DATASET,
            "description": "Edge proxy request logs",
            "created_at": "2024-01-01T00:00:00Z",
            "last_written_at": "2024-06-01T12:00:00Z",
            "regular_columns_count": 3
        }),
        (Method::GET, ["1", "datasets", _]) => return not_found("dataset"),
        (Method::GET, ["1", "columns", DATASET]) => {
            let columns = json!([
                {"id": "c1", "key_name": "duration_ms", "type": "float", "hidden": false},
                {"id": "c2", "key_name": "trace.trace_id", "type": "string", "hidden": true},
                {"id": "c3", "key_name": "http.route", "type": "string", "hidden": false}
            ]);
            match key_name {
                Some(key_name) => {
                    let found = columns
                        .as_array()
                        .into_iter()
                        .flatten()
                        .find(|column| column["key_name"] == key_name.as_str())
                        .cloned();
                    match found {
                        Some(column) => column,
                        None => return not_found("column"),
                    }
                }
                None => columns,
            }
        }
        (Method::POST, ["1", "queries", DATASET]) => {
            let mut query = recorded.body.unwrap_or_else(|| json!({}));
            query["id"] = json!("q-1");
            query
        }
        (Method::POST, ["1", "query_results", DATASET]) => json!({
            "id": "qr-1",
            "complete": false,
            "links": {}
        }),
        (Method::GET, ["1", "query_results", DATASET, "qr-1"]) => {
            inner.polls += 1;
            let complete = server.complete_after.is_some_and(|n| inner.polls >= n);
            if complete {
                json!({
                    "id": "qr-1",
                    "complete": true,
                    "data": {
                        "results": [
                            {"data": {"http.route": "/api", "COUNT": 90}},
                            {"data": {"http.route": "/health", "COUNT": 10}}
                        ]
                    },
                    "links": {
                        "query_url": "https://ui.honeycomb.io/team/environments/prod/datasets/web-logs/result/qr-1",
                        "graph_image_url": "https://ui.honeycomb.io/graph.png"
                    }
                })
            } else {
                json!({"id": "qr-1", "complete": false, "links": {}})
            }
        }
        (Method::GET, ["1", "slos", DATASET]) => json!([
            {"id": "slo-1", "name": "API availability", "target_per_million": 999000}
        ]),
        (Method::GET, ["1", "slos", DATASET, "slo-1"]) => json!({
            "id": "slo-1",
            "name": "API availability",
            "target_per_million": 999000,
            "compliance": 99.95,
            "budget_remaining": 42.5
        }),
        (Method::GET, ["1", "triggers", DATASET]) => json!([
            {"id": "tr-1", "name": "High latency", "disabled": false, "triggered": true}
        ]),
        (Method::GET, ["1", "triggers", DATASET, "tr-1"]) => json!({
            "id": "tr-1",
            "name": "High latency",
            "disabled": false,
            "triggered": true,
            "frequency": 900
        }),
        _ => return not_found("route"),
    };

    axum::Json(body).into_response()
}
