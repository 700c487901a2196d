//! Shared helpers: a scripted stand-in for the upstream query endpoint, a
//! sleeper that records instead of waiting, and record fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use notion_geojson_feed::infra::notion::Sleeper;
use notion_geojson_feed::Config;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#;

/// A request the fake upstream received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub database_id: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Default)]
struct Script {
    responses: VecDeque<(StatusCode, Value)>,
    seen: Vec<SeenRequest>,
}

/// Serves scripted responses in order; answers 500 once the script runs out.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    script: Arc<Mutex<Script>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: StatusCode, body: Value) -> &Self {
        self.script
            .lock()
            .unwrap()
            .responses
            .push_back((status, body));
        self
    }

    pub fn page(&self, results: Vec<Value>, next_cursor: Option<&str>) -> &Self {
        self.respond(
            StatusCode::OK,
            json!({
                "object": "list",
                "results": results,
                "has_more": next_cursor.is_some(),
                "next_cursor": next_cursor,
            }),
        )
    }

    pub fn rate_limited(&self) -> &Self {
        self.respond(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"object": "error", "status": 429, "code": "rate_limited"}),
        )
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.script.lock().unwrap().seen.clone()
    }

    /// Binds to an ephemeral port and returns the API base URL.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/v1/databases/:database_id/query", post(query_handler))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://127.0.0.1:{}/v1", port)
    }
}

async fn query_handler(
    State(fake): State<FakeUpstream>,
    Path(database_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut script = fake.script.lock().unwrap();
    script.seen.push(SeenRequest {
        database_id,
        headers,
        body,
    });
    let (status, body) = script.responses.pop_front().unwrap_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"object": "error", "message": "script exhausted"}),
    ));
    (status, Json(body))
}

/// Records every requested pause and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

pub fn config_for(api_base: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("NOTION_TOKEN".to_string(), "secret_test_token".to_string()),
        ("NOTION_DATABASE_ID".to_string(), "db-123".to_string()),
        ("NOTION_API_BASE".to_string(), api_base.to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

pub fn rich_text(text: &str) -> Value {
    json!({"id": "rt", "type": "rich_text", "rich_text": [{"type": "text", "plain_text": text}]})
}

pub fn select(name: &str) -> Value {
    json!({"id": "sel", "type": "select", "select": {"id": "o1", "name": name, "color": "blue"}})
}

pub fn multi_select(names: &[&str]) -> Value {
    let options: Vec<Value> = names.iter().map(|n| json!({"name": n})).collect();
    json!({"id": "ms", "type": "multi_select", "multi_select": options})
}

pub fn page_record(id: &str, properties: Value) -> Value {
    json!({"object": "page", "id": id, "properties": properties})
}

/// A record with only a valid polygon, distinguishable by id.
pub fn polygon_record(id: &str) -> Value {
    page_record(id, json!({"Polygon": rich_text(SQUARE)}))
}
