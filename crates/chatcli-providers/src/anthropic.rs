//! Anthropic Messages API adapter.
//!
//! Differs from the OpenAI shape in three ways: the key goes in `x-api-key`,
//! system messages travel in a top-level `system` field rather than the message
//! list, and every request carries a `max_tokens` cap.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use chatcli_core::types::{Message, Role};

use crate::error::ProviderError;
use crate::http::{build_client, join_url, send_json};
use crate::registry::{ProviderDescriptor, ProviderParams};
use crate::traits::ChatProvider;

/// Output token cap sent with every request.
pub const MAX_OUTPUT_TOKENS: u32 = 4000;

/// Value of the `anthropic-version` header.
pub const API_VERSION: &str = "2023-06-01";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<&'a Message>,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// Split the transcript into the `system` field and the message list.
///
/// When several system messages are present the last one wins.
fn to_request<'a>(model: &'a str, history: &'a [Message]) -> Request<'a> {
    let mut system = None;
    let mut messages = Vec::with_capacity(history.len());

    for msg in history {
        match msg.role {
            Role::System => system = Some(msg.content.as_str()),
            Role::User | Role::Assistant => messages.push(msg),
        }
    }

    Request {
        model,
        max_tokens: MAX_OUTPUT_TOKENS,
        system,
        messages,
    }
}

fn reply_text(response: Response) -> Option<String> {
    let text = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");
    (!text.is_empty()).then_some(text)
}

// ============================================================================
// Provider
// ============================================================================

/// Anthropic provider with native API format.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    spec: &'static ProviderDescriptor,
}

impl AnthropicProvider {
    pub fn new(spec: &'static ProviderDescriptor, params: ProviderParams) -> Self {
        Self {
            client: build_client(),
            api_base: spec.api_base(&params),
            api_key: params.api_key,
            spec,
        }
    }

    /// Registry constructor.
    pub fn boxed(spec: &'static ProviderDescriptor, params: ProviderParams) -> Box<dyn ChatProvider> {
        Box::new(Self::new(spec, params))
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn descriptor(&self) -> &'static ProviderDescriptor {
        self.spec
    }

    async fn send_request(
        &mut self,
        model: &str,
        history: &[Message],
    ) -> Result<String, ProviderError> {
        let provider = self.spec.display_name;
        let body = to_request(model, history);

        let request = self
            .client
            .post(join_url(&self.api_base, "v1/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);

        let response: Response = send_json(provider, request).await?;
        debug!(
            provider,
            stop_reason = response.stop_reason.as_deref().unwrap_or("?"),
            blocks = response.content.len(),
            "LLM response received"
        );

        reply_text(response)
            .ok_or_else(|| ProviderError::malformed(provider, "response has no text content"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base: &str) -> AnthropicProvider {
        AnthropicProvider::new(
            find_by_name("claude").unwrap(),
            ProviderParams::new("sk-ant-test").with_api_base(base),
        )
    }

    #[test]
    fn test_system_extracted_from_messages() {
        let history = vec![
            Message::system("Be concise."),
            Message::user("Hi"),
            Message::assistant("Hello"),
            Message::user("Bye"),
        ];
        let request = to_request("claude-3-haiku-20240307", &history);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["system"], "Be concise.");
        assert_eq!(json["max_tokens"], 4000);
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m["role"] != "system"));
    }

    #[test]
    fn test_no_system_field_without_system_message() {
        let history = vec![Message::user("Hi")];
        let json = serde_json::to_value(to_request("m", &history)).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_last_system_message_wins() {
        let history = vec![
            Message::system("first"),
            Message::user("Hi"),
            Message::system("second"),
        ];
        let request = to_request("m", &history);
        assert_eq!(request.system, Some("second"));
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_reply_text_skips_non_text_blocks() {
        let response: Response = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "thinking", "thinking": "hmm" },
                { "type": "text", "text": "Hello " },
                { "type": "text", "text": "world" }
            ],
            "stop_reason": "end_turn"
        }))
        .unwrap();
        assert_eq!(reply_text(response).as_deref(), Some("Hello world"));
    }

    #[tokio::test]
    async fn test_send_request_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_json(serde_json::json!({
                "model": "claude-3-5-sonnet-20241022",
                "max_tokens": 4000,
                "system": "You are helpful.",
                "messages": [{ "role": "user", "content": "Hello" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": "Hi! How can I help?" }],
                "stop_reason": "end_turn",
                "usage": { "input_tokens": 12, "output_tokens": 7 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut provider = provider(&mock_server.uri());
        let history = vec![Message::system("You are helpful."), Message::user("Hello")];

        let reply = provider
            .send_request("claude-3-5-sonnet-20241022", &history)
            .await
            .unwrap();
        assert_eq!(reply, "Hi! How can I help?");
    }

    #[tokio::test]
    async fn test_send_request_overloaded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_json(serde_json::json!({
                "type": "error",
                "error": { "type": "overloaded_error", "message": "Overloaded" }
            })))
            .mount(&mock_server)
            .await;

        let mut provider = provider(&mock_server.uri());
        let err = provider
            .send_request("claude-3-opus-20240229", &[Message::user("Hello")])
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api { .. }));
        assert!(err.to_string().contains("Overloaded"));
    }

    #[tokio::test]
    async fn test_send_request_empty_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [],
                "stop_reason": "max_tokens"
            })))
            .mount(&mock_server)
            .await;

        let mut provider = provider(&mock_server.uri());
        let err = provider
            .send_request("claude-3-opus-20240229", &[Message::user("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
    }
}
