//! Adapter for OpenAI-compatible `/chat/completions` APIs.
//!
//! Covers OpenAI, DeepSeek and Grok: same request and response shape, different
//! base URL, key and model list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use chatcli_core::types::Message;

use crate::error::ProviderError;
use crate::http::{build_client, join_url, send_json};
use crate::registry::{ProviderDescriptor, ProviderParams};
use crate::traits::ChatProvider;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

// ─────────────────────────────────────────────
// OpenAiCompatProvider
// ─────────────────────────────────────────────

/// A provider that talks to any OpenAI-compatible HTTP API.
pub struct OpenAiCompatProvider {
    /// HTTP client (connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    spec: &'static ProviderDescriptor,
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("api_base", &self.api_base)
            .field("provider", &self.spec.name)
            .finish()
    }
}

impl OpenAiCompatProvider {
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

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        join_url(&self.api_base, "chat/completions")
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn descriptor(&self) -> &'static ProviderDescriptor {
        self.spec
    }

    async fn send_request(
        &mut self,
        model: &str,
        history: &[Message],
    ) -> Result<String, ProviderError> {
        let provider = self.spec.display_name;
        let body = ChatCompletionRequest {
            model,
            messages: history,
            stream: false,
        };

        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: ChatCompletionResponse = send_json(provider, request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed(provider, "no choices in response"))?;

        debug!(
            provider,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );

        choice
            .message
            .content
            .ok_or_else(|| ProviderError::malformed(provider, "reply has no text content"))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
