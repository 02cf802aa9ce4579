//! In-memory provider for tests

use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::{
    OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIChoice, OpenAIMessage,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Script {
    Reply(String),
    Empty,
    Fail(fn() -> ProviderError),
    Panic(&'static str),
}

/// Answers every request with the same scripted reply and records what it saw
pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
    last_request: Mutex<Option<OpenAIChatCompletionRequest>>,
}

impl ScriptedProvider {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    /// Replies with a choice whose content is null
    pub fn empty() -> Self {
        Self::new(Script::Empty)
    }

    pub fn fail(error: fn() -> ProviderError) -> Self {
        Self::new(Script::Fail(error))
    }

    /// Panics inside `create_chat_completion`
    pub fn panic(message: &'static str) -> Self {
        Self::new(Script::Panic(message))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<OpenAIChatCompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn create_chat_completion(
        &self,
        request: &OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let message = match &self.script {
            Script::Reply(text) => OpenAIMessage::text("assistant", text.clone()),
            Script::Empty => OpenAIMessage {
                role: "assistant".to_string(),
                content: None,
            },
            Script::Fail(error) => return Err(error()),
            Script::Panic(message) => panic!("{}", message),
        };

        Ok(OpenAIChatCompletionResponse {
            id: "chatcmpl-test".to_string(),
            model: request.model.clone(),
            choices: vec![OpenAIChoice {
                index: 0,
                message,
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        })
    }

    fn provider_name(&self) -> &str {
        "Scripted"
    }
}
