//! A stand-in Ollama server on an ephemeral local port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// How long the `slow` model takes to answer.
pub const SLOW_REPLY: Duration = Duration::from_secs(3);

/// Requests received by the fake server, in order.
pub type Captured = Arc<Mutex<Vec<Value>>>;

async fn chat(State(captured): State<Captured>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    captured.lock().unwrap().push(body);

    if model == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("model '{model}' not found") })),
        );
    }
    if model == "slow" {
        tokio::time::sleep(SLOW_REPLY).await;
    }
    if model == "broken" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "runner crashed" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "model": model,
            "message": { "role": "assistant", "content": format!("hello from {model}") },
            "done": true
        })),
    )
}

async fn tags() -> Json<Value> {
    Json(json!({
        "models": [
            { "name": "mistral:7b", "size": 4_109_865_159_u64 },
            { "name": "llama3:70b", "size": 39_969_745_349_u64 },
            { "name": "phi3:3B", "size": 2_176_178_913_u64 }
        ]
    }))
}

/// Start the fake server and return its base URL with the capture log.
pub async fn spawn() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/chat", post(chat))
        .route("/api/tags", get(tags))
        .with_state(Arc::clone(&captured));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

/// A local address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
