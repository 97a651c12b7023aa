//! LLM Provider trait: the uniform contract every backend satisfies.
//!
//! Static metadata comes from the provider's [`ProviderDescriptor`]; the only
//! behavior an adapter really supplies is [`ChatProvider::send_request`].
//! Turn-taking (history, error rendering, model validation) lives in
//! [`crate::conversation::Conversation`] and is shared by all adapters.

use async_trait::async_trait;
use chatcli_core::types::Message;

use crate::error::ProviderError;
use crate::registry::ProviderDescriptor;

/// Trait that all chat backends implement.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Static metadata for this backend.
    fn descriptor(&self) -> &'static ProviderDescriptor;

    /// The model used when none is requested.
    fn default_model(&self) -> &'static str {
        self.descriptor().default_model
    }

    /// Models this backend accepts, in display order.
    fn available_models(&self) -> &'static [&'static str] {
        self.descriptor().available_models
    }

    /// Environment variable holding the API key.
    fn credential_env_var(&self) -> &'static str {
        self.descriptor().credential_env_var
    }

    /// Perform one completion call with the full transcript as context.
    ///
    /// # Arguments
    /// * `model`  : Model identifier, already validated against `available_models()`.
    /// * `history`: Conversation so far; the last entry is the new user message.
    ///
    /// # Returns
    /// The assistant's reply text. Transport, authentication and parse failures
    /// are all reported as [`ProviderError`].
    async fn send_request(&mut self, model: &str, history: &[Message])
        -> Result<String, ProviderError>;

    /// Drop any server-side or session state. Called when history is cleared.
    fn reset_session(&mut self) {}
}
