//! Provider registry: static descriptors for the five supported backends,
//! alias resolution, and the credential resolver that builds live providers.
//!
//! The table is fixed at compile time. Each [`ProviderDescriptor`] carries the
//! constructor for its adapter, so resolution is a lookup followed by one call.

use chatcli_core::config::ConfigStore;
use tracing::debug;

use crate::anthropic::AnthropicProvider;
use crate::conversation::Conversation;
use crate::error::ChatError;
use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::traits::ChatProvider;

// ─────────────────────────────────────────────
// ProviderDescriptor: static metadata for one provider
// ─────────────────────────────────────────────

/// Connection parameters resolved for one provider instance.
#[derive(Clone, Debug)]
pub struct ProviderParams {
    /// API key sent with every request.
    pub api_key: String,
    /// Endpoint override. `None` uses the descriptor's `default_api_base`.
    pub api_base: Option<String>,
}

impl ProviderParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }
}

/// Static metadata describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    /// Canonical name (e.g. `"claude"`).
    pub name: &'static str,
    /// Human-readable name for logs and prompts. E.g. `"Anthropic Claude"`.
    pub display_name: &'static str,
    /// Model used when none is requested. Always in `available_models`.
    pub default_model: &'static str,
    /// Accepted models, in display order.
    pub available_models: &'static [&'static str],
    /// Environment variable for the API key. E.g. `"ANTHROPIC_API_KEY"`.
    pub credential_env_var: &'static str,
    /// Built-in API base URL.
    pub default_api_base: &'static str,
    /// Adapter constructor.
    pub build: fn(&'static ProviderDescriptor, ProviderParams) -> Box<dyn ChatProvider>,
}

impl ProviderDescriptor {
    /// Whether `model` is one of this provider's models.
    pub fn supports_model(&self, model: &str) -> bool {
        self.available_models.contains(&model)
    }

    /// The endpoint to use given an optional override.
    pub fn api_base(&self, params: &ProviderParams) -> String {
        params
            .api_base
            .clone()
            .unwrap_or_else(|| self.default_api_base.to_string())
    }

    /// Construct the adapter for this provider.
    pub fn instantiate(&'static self, params: ProviderParams) -> Box<dyn ChatProvider> {
        (self.build)(self, params)
    }
}

// ─────────────────────────────────────────────
// All 5 providers
// ─────────────────────────────────────────────

/// Complete list of supported providers, in display order.
pub static PROVIDERS: &[ProviderDescriptor] = &[
    // 1. OpenAI: standard chat completions
    ProviderDescriptor {
        name: "openai",
        display_name: "OpenAI (ChatGPT)",
        default_model: "gpt-4o-mini",
        available_models: &[
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-4-turbo",
            "gpt-4",
            "gpt-3.5-turbo",
            "o1-preview",
            "o1-mini",
        ],
        credential_env_var: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        build: OpenAiCompatProvider::boxed,
    },
    // 2. DeepSeek: OpenAI-compatible, own endpoint
    ProviderDescriptor {
        name: "deepseek",
        display_name: "DeepSeek",
        default_model: "deepseek-chat",
        available_models: &["deepseek-chat", "deepseek-reasoner"],
        credential_env_var: "DEEPSEEK_API_KEY",
        default_api_base: "https://api.deepseek.com",
        build: OpenAiCompatProvider::boxed,
    },
    // 3. Claude: Anthropic Messages API, system prompt as a top-level field
    ProviderDescriptor {
        name: "claude",
        display_name: "Anthropic Claude",
        default_model: "claude-3-5-sonnet-20241022",
        available_models: &[
            "claude-3-5-sonnet-20241022",
            "claude-3-5-haiku-20241022",
            "claude-3-opus-20240229",
            "claude-3-sonnet-20240229",
            "claude-3-haiku-20240307",
        ],
        credential_env_var: "ANTHROPIC_API_KEY",
        default_api_base: "https://api.anthropic.com",
        build: AnthropicProvider::boxed,
    },
    // 4. Gemini: stateful chat session
    ProviderDescriptor {
        name: "gemini",
        display_name: "Google Gemini",
        default_model: "gemini-2.0-flash",
        available_models: &[
            "gemini-2.0-flash",
            "gemini-2.0-flash-lite",
            "gemini-1.5-pro",
            "gemini-1.5-flash",
        ],
        credential_env_var: "GOOGLE_API_KEY",
        default_api_base: "https://generativelanguage.googleapis.com",
        build: GeminiProvider::boxed,
    },
    // 5. Grok: OpenAI-compatible, own endpoint
    ProviderDescriptor {
        name: "grok",
        display_name: "xAI Grok",
        default_model: "grok-4",
        available_models: &["grok-4", "grok-3", "grok-3-mini", "grok-beta"],
        credential_env_var: "XAI_API_KEY",
        default_api_base: "https://api.x.ai/v1",
        build: OpenAiCompatProvider::boxed,
    },
];

/// User-facing synonyms for canonical provider names.
pub static ALIASES: &[(&str, &str)] = &[
    ("chatgpt", "openai"),
    ("gpt", "openai"),
    ("anthropic", "claude"),
    ("google", "gemini"),
    ("xai", "grok"),
];

/// Model-name fragments used by [`auto_detect`], in priority order.
static MODEL_HINTS: &[(&str, &str)] = &[
    ("gpt", "openai"),
    ("o1", "openai"),
    ("claude", "claude"),
    ("gemini", "gemini"),
    ("deepseek", "deepseek"),
    ("grok", "grok"),
];

/// Provider used when nothing else decides.
pub const FALLBACK_PROVIDER: &str = "openai";

// ─────────────────────────────────────────────
// Lookup functions
// ─────────────────────────────────────────────

/// Canonical provider names, in table order.
pub fn provider_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|spec| spec.name).collect()
}

/// Resolve a provider name or alias to its canonical form.
///
/// Case-insensitive. Names that are neither canonical nor aliases are returned
/// lower-cased but otherwise unchanged.
pub fn resolve_name(input: &str) -> String {
    let name = input.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(name)
}

/// Find a provider descriptor by exact canonical name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderDescriptor> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Resolve `name` (alias or canonical) to its descriptor.
pub fn lookup(name: &str) -> Result<&'static ProviderDescriptor, ChatError> {
    let canonical = resolve_name(name);
    find_by_name(&canonical).ok_or_else(|| ChatError::UnknownProvider {
        name: canonical,
        available: provider_names(),
    })
}

/// Guess a provider from a model name.
///
/// Best-effort substring match; not checked against the model lists.
/// Falls back to [`FALLBACK_PROVIDER`] when nothing matches or no model is given.
pub fn auto_detect(model: Option<&str>) -> &'static str {
    let Some(model) = model.filter(|m| !m.is_empty()) else {
        return FALLBACK_PROVIDER;
    };
    let model_lower = model.to_lowercase();
    MODEL_HINTS
        .iter()
        .find(|(fragment, _)| model_lower.contains(fragment))
        .map(|(_, provider)| *provider)
        .unwrap_or(FALLBACK_PROVIDER)
}

/// Static metadata for one provider, or for all of them when `name` is `None`.
///
/// Never needs a credential.
pub fn describe(name: Option<&str>) -> Result<Vec<&'static ProviderDescriptor>, ChatError> {
    match name {
        Some(name) => lookup(name).map(|spec| vec![spec]),
        None => Ok(PROVIDERS.iter().collect()),
    }
}

/// Whether `name` (alias or canonical) is a supported provider.
pub fn validate_provider(name: &str) -> bool {
    lookup(name).is_ok()
}

/// Whether `model` is available for provider `name`.
pub fn validate_model(name: &str, model: &str) -> bool {
    lookup(name).map_or(false, |spec| spec.supports_model(model))
}

// ─────────────────────────────────────────────
// Resolver: credentials + instantiation
// ─────────────────────────────────────────────

/// Where a resolved API key came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Argument,
    Environment,
    Config,
}

fn read_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

/// Builds ready-to-use providers.
///
/// API keys are looked up in order: explicit argument, the provider's
/// environment variable, then the config store (if one is attached).
pub struct Resolver<'a> {
    store: Option<&'a dyn ConfigStore>,
    env: fn(&str) -> Option<String>,
}

impl Default for Resolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    /// A resolver reading the process environment, without a config store.
    pub fn new() -> Self {
        Self {
            store: None,
            env: read_env,
        }
    }

    /// Fall back to `store` for keys and endpoint overrides.
    pub fn with_store(mut self, store: &'a dyn ConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the environment lookup.
    pub fn with_env(mut self, env: fn(&str) -> Option<String>) -> Self {
        self.env = env;
        self
    }

    /// Find the API key for `spec`, reporting where it came from.
    pub fn resolve_api_key(
        &self,
        spec: &ProviderDescriptor,
        api_key: Option<&str>,
    ) -> Option<(String, CredentialSource)> {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            return Some((key.to_string(), CredentialSource::Argument));
        }
        if let Some(key) = (self.env)(spec.credential_env_var) {
            return Some((key, CredentialSource::Environment));
        }
        self.store
            .and_then(|store| store.get_api_key(spec.name))
            .map(|key| (key, CredentialSource::Config))
    }

    /// Where the key for `name` would come from, if anywhere. Never fails.
    pub fn credential_source(&self, name: &str) -> Option<CredentialSource> {
        let spec = lookup(name).ok()?;
        self.resolve_api_key(spec, None).map(|(_, source)| source)
    }

    /// Resolve `name`, find a key, and construct the provider.
    ///
    /// # Errors
    /// * [`ChatError::UnknownProvider`]: not in the registry after alias resolution.
    /// * [`ChatError::MissingCredential`]: no key from argument, environment or config.
    /// * [`ChatError::InvalidModel`]: `model` is not in the provider's model list.
    pub fn create(
        &self,
        name: &str,
        api_key: Option<&str>,
        model: Option<&str>,
    ) -> Result<Conversation, ChatError> {
        let spec = lookup(name)?;

        let (api_key, source) =
            self.resolve_api_key(spec, api_key)
                .ok_or_else(|| ChatError::MissingCredential {
                    provider: spec.name.to_string(),
                    env_var: spec.credential_env_var,
                })?;

        let params = ProviderParams {
            api_key,
            api_base: self.store.and_then(|store| store.get_api_base(spec.name)),
        };

        debug!(
            provider = spec.name,
            model = model.unwrap_or(spec.default_model),
            credential = ?source,
            api_base = params.api_base.as_deref().unwrap_or(spec.default_api_base),
            "Creating LLM provider"
        );

        Conversation::new(spec.instantiate(params), model)
    }
}

/// Build a provider using the process environment for credentials.
pub fn create(
    name: &str,
    api_key: Option<&str>,
    model: Option<&str>,
) -> Result<Conversation, ChatError> {
    Resolver::new().create(name, api_key, model)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
