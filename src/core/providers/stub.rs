//! Local HTTP stand-in for an OpenAI-compatible endpoint, used by provider tests

use crate::models::openai::OpenAIChatCompletionRequest;
use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, Uri},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// What the stub saw for one request
#[derive(Debug, Clone)]
pub struct Captured {
    pub uri: String,
    pub headers: HeaderMap,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Answers every request with a fixed status and JSON body
pub struct StubServer {
    pub base_url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl StubServer {
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback({
            let captured = captured.clone();
            move |uri: Uri, headers: HeaderMap| {
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    captured.lock().unwrap().push(Captured {
                        uri: uri.to_string(),
                        headers,
                    });
                    (status, Json(body))
                }
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            captured,
        }
    }

    /// Replies 200 with a single choice carrying `text`
    pub async fn replying(text: &str) -> Self {
        Self::start(
            StatusCode::OK,
            json!({
                "id": "chatcmpl-stub",
                "model": "stub",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
            }),
        )
        .await
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

pub fn chat_request(model: &str) -> OpenAIChatCompletionRequest {
    OpenAIChatCompletionRequest {
        model: model.to_string(),
        messages: vec![crate::models::openai::OpenAIMessage::text("user", "x = x?")],
        temperature: Some(0.0),
        stream: false,
    }
}
