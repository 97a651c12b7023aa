//! Shared turn-taking over any [`ChatProvider`].
//!
//! A `Conversation` is a live provider instance: the adapter (which owns the
//! API key and any session state), the selected model, and the transcript.

use chatcli_core::types::{Message, Role};
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::traits::ChatProvider;

/// Snapshot of a conversation's provider and model, for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub model: String,
    pub default_model: &'static str,
    pub available_models: &'static [&'static str],
}

/// A provider bound to a model and a message history.
pub struct Conversation {
    provider: Box<dyn ChatProvider>,
    model: String,
    history: Vec<Message>,
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("provider", &self.provider.descriptor().name)
            .field("model", &self.model)
            .field("messages", &self.history.len())
            .finish()
    }
}

impl Conversation {
    /// Wrap `provider`, selecting `model` or the provider's default.
    ///
    /// Fails with [`ChatError::InvalidModel`] if `model` is not offered by the provider.
    pub fn new(provider: Box<dyn ChatProvider>, model: Option<&str>) -> Result<Self, ChatError> {
        let model = model.unwrap_or(provider.default_model());
        ensure_available(provider.as_ref(), model)?;
        Ok(Self {
            model: model.to_string(),
            provider,
            history: Vec::new(),
        })
    }

    /// Canonical provider name.
    pub fn name(&self) -> &'static str {
        self.provider.descriptor().name
    }

    /// Human-readable provider name.
    pub fn display_name(&self) -> &'static str {
        self.provider.descriptor().display_name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Append a message without calling the provider (e.g. a system prompt).
    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Run one turn: record `user_text`, call the provider with the full
    /// history, record and return the reply.
    ///
    /// A failed call is returned as `"Error: ..."`. The user message stays in
    /// history either way; only successful replies are recorded.
    pub async fn converse(&mut self, user_text: &str) -> String {
        self.history.push(Message::user(user_text));

        debug!(
            provider = self.name(),
            model = %self.model,
            messages = self.history.len(),
            "Calling LLM"
        );

        match self.provider.send_request(&self.model, &self.history).await {
            Ok(reply) => {
                self.history.push(Message::new(Role::Assistant, reply.clone()));
                reply
            }
            Err(e) => {
                warn!(provider = self.name(), error = %e, "LLM request failed");
                format!("Error: {e}")
            }
        }
    }

    /// Forget the transcript and any provider session state.
    pub fn clear(&mut self) {
        self.history.clear();
        self.provider.reset_session();
    }

    /// Switch to `requested` if the provider offers it.
    pub fn set_model(&mut self, requested: &str) -> Result<(), ChatError> {
        ensure_available(self.provider.as_ref(), requested)?;
        self.model = requested.to_string();
        Ok(())
    }

    pub fn info(&self) -> ProviderInfo {
        let spec = self.provider.descriptor();
        ProviderInfo {
            name: spec.name,
            display_name: spec.display_name,
            model: self.model.clone(),
            default_model: spec.default_model,
            available_models: spec.available_models,
        }
    }
}

fn ensure_available(provider: &dyn ChatProvider, model: &str) -> Result<(), ChatError> {
    let available = provider.available_models();
    if available.contains(&model) {
        Ok(())
    } else {
        Err(ChatError::InvalidModel {
            model: model.to_string(),
            available: available.to_vec(),
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::registry::{find_by_name, ProviderDescriptor};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records every call and replies from a script.
    struct ScriptedProvider {
        spec: &'static ProviderDescriptor,
        replies: Vec<Result<String, &'static str>>,
        seen: Arc<Mutex<Vec<(String, usize)>>>,
        resets: Arc<Mutex<usize>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, &'static str>>) -> Self {
            Self {
                spec: find_by_name("openai").unwrap(),
                replies,
                seen: Arc::default(),
                resets: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn descriptor(&self) -> &'static ProviderDescriptor {
            self.spec
        }

        async fn send_request(
            &mut self,
            model: &str,
            history: &[Message],
        ) -> Result<String, ProviderError> {
            self.seen
                .lock()
                .unwrap()
                .push((model.to_string(), history.len()));
            match self.replies.remove(0) {
                Ok(reply) => Ok(reply),
                Err(reason) => Err(ProviderError::malformed("OpenAI", reason)),
            }
        }

        fn reset_session(&mut self) {
            *self.resets.lock().unwrap() += 1;
        }
    }

    #[tokio::test]
    async fn test_two_turns_build_ordered_history() {
        let provider = ScriptedProvider::new(vec![Ok("hello".into()), Ok("again to you".into())]);
        let seen = provider.seen.clone();
        let mut conversation = Conversation::new(Box::new(provider), None).unwrap();

        assert_eq!(conversation.converse("hi").await, "hello");
        assert_eq!(conversation.converse("again").await, "again to you");

        assert_eq!(
            conversation.history(),
            &[
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("again"),
                Message::assistant("again to you"),
            ]
        );
        // Each call sees the full history including the new user message
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("gpt-4o-mini".to_string(), 1), ("gpt-4o-mini".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_user_message() {
        let provider = ScriptedProvider::new(vec![Err("no choices in response")]);
        let mut conversation = Conversation::new(Box::new(provider), None).unwrap();

        let reply = conversation.converse("hi").await;

        assert!(reply.starts_with("Error: "), "{reply}");
        assert!(reply.contains("no choices in response"));
        assert_eq!(conversation.history(), &[Message::user("hi")]);
    }

    #[tokio::test]
    async fn test_clear_resets_history_and_session() {
        let provider = ScriptedProvider::new(vec![Ok("one".into()), Ok("two".into())]);
        let resets = provider.resets.clone();
        let seen = provider.seen.clone();
        let mut conversation = Conversation::new(Box::new(provider), None).unwrap();

        conversation.converse("first").await;
        conversation.clear();
        assert!(conversation.history().is_empty());
        assert_eq!(*resets.lock().unwrap(), 1);

        conversation.converse("second").await;
        assert_eq!(conversation.history().len(), 2);
        assert_eq!(seen.lock().unwrap()[1].1, 1);
    }

    #[tokio::test]
    async fn test_system_prompt_is_sent() {
        let provider = ScriptedProvider::new(vec![Ok("ok".into())]);
        let seen = provider.seen.clone();
        let mut conversation = Conversation::new(Box::new(provider), None).unwrap();

        conversation.push(Message::system("Be brief."));
        conversation.converse("hi").await;

        assert_eq!(seen.lock().unwrap()[0].1, 2);
        assert_eq!(conversation.history().len(), 3);
    }

    #[test]
    fn test_set_model_accepts_listed_model() {
        let provider = ScriptedProvider::new(vec![]);
        let mut conversation = Conversation::new(Box::new(provider), None).unwrap();

        conversation.set_model("o1-mini").unwrap();
        assert_eq!(conversation.model(), "o1-mini");
        assert_eq!(conversation.info().model, "o1-mini");
    }

    #[test]
    fn test_set_model_rejects_unlisted_model() {
        let provider = ScriptedProvider::new(vec![]);
        let mut conversation = Conversation::new(Box::new(provider), None).unwrap();

        let err = conversation.set_model("claude-3-opus-20240229").unwrap_err();
        match err {
            ChatError::InvalidModel { model, available } => {
                assert_eq!(model, "claude-3-opus-20240229");
                assert!(available.contains(&"gpt-4o"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(conversation.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_new_rejects_unlisted_model() {
        let provider = ScriptedProvider::new(vec![]);
        assert!(Conversation::new(Box::new(provider), Some("gpt-9")).is_err());
    }

    #[test]
    fn test_info() {
        let provider = ScriptedProvider::new(vec![]);
        let conversation = Conversation::new(Box::new(provider), Some("gpt-4o")).unwrap();
        let info = conversation.info();

        assert_eq!(info.name, "openai");
        assert_eq!(info.default_model, "gpt-4o-mini");
        assert_eq!(info.model, "gpt-4o");
        assert!(info.available_models.contains(&"gpt-4o"));
    }
}
