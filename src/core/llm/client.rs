//! Generation endpoint: OpenAI-compatible chat completions, streamed or unary.

use std::future::Future;
use std::pin::Pin;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use futures::{Stream, StreamExt};
use serde_json::{Value, json};

use crate::core::chat::Turn;
use crate::core::config::Config;
use crate::core::models::{Probe, ResolveError};

use super::stream;
use super::{ChatError, map_api_error};

/// Pull-based sequence of text deltas. `None` from the stream is the terminal signal.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Prompt sent by the probe policy.
const PROBE_PROMPT: &str = "ping";

/// One generation call: model, optional system instruction, prior turns and the new prompt.
#[derive(Clone, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system: Option<&'a str>,
    pub temperature: f32,
    /// Prior turns only; never includes `prompt`.
    pub history: &'a [Turn],
    pub prompt: &'a str,
    pub max_tokens: Option<u32>,
}

/// Build the role-labeled message list: system, history, then the new user prompt.
pub fn build_messages(system: Option<&str>, history: &[Turn], prompt: &str) -> Vec<Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(sys) = system.map(str::trim).filter(|s| !s.is_empty()) {
        messages.push(json!({"role": "system", "content": sys}));
    }
    for turn in history {
        messages.push(json!({"role": turn.role().api_role(), "content": turn.text()}));
    }
    messages.push(json!({"role": "user", "content": prompt}));
    messages
}

fn request_body(request: &ChatRequest<'_>, stream: bool) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": build_messages(request.system, request.history, request.prompt),
        "temperature": request.temperature,
        "stream": stream,
    });
    if let Some(max) = request.max_tokens {
        body["max_tokens"] = json!(max);
    }
    body
}

/// Something that can answer a chat request.
pub trait TextGenerator {
    fn stream(
        &self,
        request: &ChatRequest<'_>,
    ) -> impl Future<Output = Result<DeltaStream, ChatError>> + Send;

    fn generate(
        &self,
        request: &ChatRequest<'_>,
    ) -> impl Future<Output = Result<String, ChatError>> + Send;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client<OpenAIConfig>,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::with_config(config.openai_config.clone()),
        }
    }
}

impl TextGenerator for GeminiClient {
    async fn stream(&self, request: &ChatRequest<'_>) -> Result<DeltaStream, ChatError> {
        log::debug!(
            "streaming request: model={} history={} prompt_len={}",
            request.model,
            request.history.len(),
            request.prompt.len()
        );
        let chunks = self
            .client
            .chat()
            .create_stream_byot::<_, Value>(request_body(request, true))
            .await
            .map_err(map_api_error)?;

        let deltas = chunks.filter_map(|item| async move {
            match item {
                Err(e) => Some(Err(map_api_error(e))),
                Ok(chunk) => {
                    if let Some(msg) = stream::chunk_error(&chunk) {
                        return Some(Err(ChatError::ApiMessage(msg)));
                    }
                    stream::delta_text(&chunk).map(|t| Ok(t.to_string()))
                }
            }
        });
        Ok(Box::pin(deltas))
    }

    async fn generate(&self, request: &ChatRequest<'_>) -> Result<String, ChatError> {
        log::debug!("unary request: model={}", request.model);
        let response: Value = self
            .client
            .chat()
            .create_byot(request_body(request, false))
            .await
            .map_err(map_api_error)?;
        if let Some(msg) = stream::chunk_error(&response) {
            return Err(ChatError::ApiMessage(msg));
        }
        Ok(stream::message_text(&response).unwrap_or_default())
    }
}

impl Probe for GeminiClient {
    async fn probe(&self, model: &str) -> Result<(), ResolveError> {
        let request = ChatRequest {
            model,
            system: None,
            temperature: 0.0,
            history: &[],
            prompt: PROBE_PROMPT,
            max_tokens: Some(1),
        };
        self.generate(&request)
            .await
            .map(|_| ())
            .map_err(|e| probe_error(model, e))
    }
}

/// Only a rejected key is fatal; any other failure just rules out this candidate.
fn probe_error(model: &str, error: ChatError) -> ResolveError {
    match error {
        ChatError::ApiAuth(msg) => ResolveError::InvalidCredential(msg),
        e => ResolveError::ProbeFailed {
            model: model.to_string(),
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::Transcript;

    #[test]
    fn token_limit_error_only_rules_out_the_candidate() {
        let error = map_api_error(std::io::Error::other(
            r#"{"error":{"code":400,"message":"Input of 14010 tokens exceeds the limit"}}"#,
        ));
        let resolved = probe_error("gemini-1.5-flash", error);
        assert!(!resolved.is_fatal());
        assert!(matches!(resolved, ResolveError::ProbeFailed { .. }));
    }

    #[test]
    fn rejected_key_fails_resolution() {
        let error = map_api_error(std::io::Error::other(
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#,
        ));
        assert!(probe_error("gemini-1.5-flash", error).is_fatal());
    }

    #[test]
    fn messages_include_system_history_and_prompt_in_order() {
        let mut transcript = Transcript::default();
        transcript.push_user("Hi");
        transcript.push_model("Hello! How can I help?");

        let messages = build_messages(Some("Be brief."), transcript.turns(), "What is Rust?");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], json!({"role": "system", "content": "Be brief."}));
        assert_eq!(messages[1], json!({"role": "user", "content": "Hi"}));
        assert_eq!(
            messages[2],
            json!({"role": "assistant", "content": "Hello! How can I help?"})
        );
        assert_eq!(messages[3], json!({"role": "user", "content": "What is Rust?"}));
    }

    #[test]
    fn blank_system_instruction_is_omitted() {
        let messages = build_messages(Some("   "), &[], "hello");
        assert_eq!(messages, vec![json!({"role": "user", "content": "hello"})]);
    }

    #[test]
    fn request_body_sets_stream_and_max_tokens() {
        let request = ChatRequest {
            model: "gemini-1.5-flash",
            system: None,
            temperature: 0.5,
            history: &[],
            prompt: "ping",
            max_tokens: Some(1),
        };
        let body = request_body(&request, false);
        assert_eq!(body["model"], "gemini-1.5-flash");
        assert_eq!(body["stream"], false);
        assert_eq!(body["max_tokens"], 1);
        assert_eq!(body["temperature"], 0.5);

        let streamed = request_body(&ChatRequest { max_tokens: None, ..request }, true);
        assert_eq!(streamed["stream"], true);
        assert!(streamed.get("max_tokens").is_none());
    }
}
