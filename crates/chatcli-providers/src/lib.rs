//! LLM provider layer for ChatCLI.
//!
//! # Architecture
//!
//! - [`traits::ChatProvider`]: trait that every backend adapter implements
//! - [`conversation::Conversation`]: shared turn-taking over any provider (history, errors)
//! - [`registry`]: static descriptors for the five providers, aliases, and the resolver
//! - [`openai_compat::OpenAiCompatProvider`]: OpenAI, DeepSeek and Grok
//! - [`anthropic::AnthropicProvider`]: Anthropic Messages API
//! - [`gemini::GeminiProvider`]: Gemini with a client-held chat session

pub mod anthropic;
pub mod conversation;
pub mod error;
pub mod gemini;
mod http;
pub mod openai_compat;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use conversation::{Conversation, ProviderInfo};
pub use error::{ChatError, ProviderError};
pub use registry::{
    auto_detect, create, describe, resolve_name, ProviderDescriptor, ProviderParams, Resolver,
    PROVIDERS,
};
pub use traits::ChatProvider;
