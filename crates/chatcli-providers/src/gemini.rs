//! Gemini adapter with a chat session.
//!
//! The session holds the turns exchanged since it was opened. Each request sends
//! the session's contents plus only the newest user text, so the transcript the
//! caller passes in is not replayed. The session is opened on the first turn
//! and dropped by [`ChatProvider::reset_session`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use chatcli_core::types::{Message, Role};

use crate::error::ProviderError;
use crate::http::{build_client, join_url, send_json};
use crate::registry::{ProviderDescriptor, ProviderParams};
use crate::traits::ChatProvider;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct Part {
    #[serde(default)]
    text: String,
}

impl Content {
    fn new(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }

    fn model(text: impl Into<String>) -> Self {
        Self::new("model", text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

// ─────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────

/// Client-held chat session: the turns the backend has already seen.
#[derive(Debug, Default)]
struct ChatSession {
    contents: Vec<Content>,
}

impl ChatSession {
    fn record(&mut self, user: Content, reply: &str) {
        self.contents.push(user);
        self.contents.push(Content::model(reply));
    }
}

// ─────────────────────────────────────────────
// GeminiProvider
// ─────────────────────────────────────────────

pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    spec: &'static ProviderDescriptor,
    /// `None` until the first turn and after a reset.
    session: Option<ChatSession>,
}

impl GeminiProvider {
    pub fn new(spec: &'static ProviderDescriptor, params: ProviderParams) -> Self {
        Self {
            client: build_client(),
            api_base: spec.api_base(&params),
            api_key: params.api_key,
            spec,
            session: None,
        }
    }

    /// Registry constructor.
    pub fn boxed(spec: &'static ProviderDescriptor, params: ProviderParams) -> Box<dyn ChatProvider> {
        Box::new(Self::new(spec, params))
    }

    /// Whether a chat session is currently open.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    fn generate_url(&self, model: &str) -> String {
        join_url(
            &self.api_base,
            &format!("v1beta/models/{model}:generateContent"),
        )
    }

    async fn generate(&self, model: &str, contents: &[Content]) -> Result<String, ProviderError> {
        let provider = self.spec.display_name;
        let request = self
            .client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest { contents });

        let response: GenerateContentResponse = send_json(provider, request).await?;
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed(provider, "no candidates in response"))?;

        let finish_reason = candidate.finish_reason.unwrap_or_else(|| "?".to_string());
        debug!(provider, finish_reason = %finish_reason, "LLM response received");

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::malformed(
                provider,
                format!("candidate has no text (finish reason: {finish_reason})"),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn descriptor(&self) -> &'static ProviderDescriptor {
        self.spec
    }

    async fn send_request(
        &mut self,
        model: &str,
        history: &[Message],
    ) -> Result<String, ProviderError> {
        let user_text = match history.last() {
            Some(msg) if msg.role == Role::User => msg.content.clone(),
            _ => {
                return Err(ProviderError::InvalidRequest {
                    provider: self.spec.display_name,
                    reason: "the last message must be a user message".to_string(),
                })
            }
        };

        if self.session.is_none() {
            debug!(provider = self.spec.display_name, "Opening chat session");
            self.session = Some(ChatSession::default());
        }

        let user = Content::user(user_text);
        let mut contents = self
            .session
            .as_ref()
            .map(|s| s.contents.clone())
            .unwrap_or_default();
        contents.push(user.clone());

        let reply = self.generate(model, &contents).await?;

        // Only successful turns become part of the session.
        if let Some(session) = self.session.as_mut() {
            session.record(user, &reply);
        }
        Ok(reply)
    }

    fn reset_session(&mut self) {
        self.session = None;
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
