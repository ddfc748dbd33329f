// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use readquiz_backend::{
    build_router,
    config::{QuizConfig, Settings},
    ollama::{GenerateError, Generator},
    pdf::{ExtractError, TextExtractor},
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const SKY_RESPONSE: &str = r#"[{"question":"What color is the sky?","options":["Red","Blue","Green","Yellow"],"answer":"Blue"}]"#;

/// What the fake generator answers with.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Refused,
    Upstream,
}

/// Generator double that records every prompt it receives.
pub struct FakeGenerator {
    replies: Mutex<Vec<Reply>>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    /// Replies are served in order; the last one repeats.
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies), prompts: Mutex::new(Vec::new()) })
    }

    pub fn text(reply: &str) -> Arc<Self> {
        Self::new(vec![Reply::Text(reply.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 { replies.remove(0) } else { replies[0].clone() }
        };
        match reply {
            Reply::Text(t) => Ok(t),
            Reply::Refused => Err(GenerateError::Connection {
                endpoint: "http://127.0.0.1:1/api/generate".into(),
                reason: "connection refused".into(),
            }),
            Reply::Upstream => Err(GenerateError::Upstream {
                status: Some(500),
                body: Some("{\"error\":\"Ollama service error\"}".into()),
                reason: "Ollama service error".into(),
            }),
        }
    }
}

/// Extractor double returning a fixed text, or failing when `None`.
pub struct FakeExtractor(pub Option<String>);

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract_text(&self, _bytes: Vec<u8>) -> Result<String, ExtractError> {
        self.0.clone().ok_or_else(|| ExtractError::Unreadable("not a pdf".into()))
    }
}

pub fn state_with(generator: Arc<FakeGenerator>, extractor: FakeExtractor) -> Arc<AppState> {
    Arc::new(AppState::new(Settings::default(), QuizConfig::default(), generator, Arc::new(extractor)))
}

pub fn app(generator: Arc<FakeGenerator>) -> Router {
    build_router(state_with(generator, FakeExtractor(None)))
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Drive one request through the router and decode the JSON body (Null if empty/not JSON).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Spawn the app on a random port. Returns the base URL (e.g. "http://127.0.0.1:12345").
pub async fn spawn_app(state: Arc<AppState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    address
}
