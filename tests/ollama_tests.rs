// tests/ollama_tests.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use readquiz_backend::ollama::{GenerateError, Generator, Ollama};
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<Value>>>;

/// Serve `app` on a random port and return the generate URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let url = format!("http://{}/api/generate", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    url
}

fn client(url: &str) -> Ollama {
    Ollama::new(url, "llama2", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn sends_non_streaming_request_and_returns_response_text() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/api/generate",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().push(body);
                Json(json!({ "model": "llama2", "response": "Hello from the model", "done": true }))
            }),
        )
        .with_state(seen.clone());
    let url = serve(app).await;

    let text = client(&url).generate("Test prompt").await.unwrap();

    assert_eq!(text, "Hello from the model");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], json!({ "model": "llama2", "prompt": "Test prompt", "stream": false }));
}

#[tokio::test]
async fn error_status_is_upstream_with_body() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Ollama service error" }))) }),
    );
    let url = serve(app).await;

    match client(&url).generate("x").await {
        Err(GenerateError::Upstream { status, body, reason }) => {
            assert_eq!(status, Some(500));
            assert!(body.unwrap().contains("Ollama service error"));
            assert_eq!(reason, "Ollama service error");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_payload_is_upstream() {
    let app = Router::new().route("/api/generate", post(|| async { "not json at all" }));
    let url = serve(app).await;

    let err = client(&url).generate("x").await.unwrap_err();
    assert!(matches!(err, GenerateError::Upstream { status: Some(200), .. }));
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    // Reserve a port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/generate", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).generate("x").await.unwrap_err();
    assert!(matches!(err, GenerateError::Connection { .. }), "got {:?}", err);
    assert_eq!(err.to_string(), "Failed to connect to Ollama API. Please ensure Ollama is running.");
}

#[tokio::test]
async fn timeout_is_connection_error() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "response": "too late" }))
        }),
    );
    let url = serve(app).await;
    let slow = Ollama::new(&url, "llama2", Duration::from_millis(200)).unwrap();

    let err = slow.generate("x").await.unwrap_err();
    assert!(matches!(err, GenerateError::Connection { .. }), "got {:?}", err);
}
