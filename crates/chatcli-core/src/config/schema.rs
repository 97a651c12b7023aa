//! Configuration schema.
//!
//! On disk the config is a single JSON object with snake_case keys:
//!
//! ```json
//! {
//!   "default_provider": "openai",
//!   "providers": { "openai": { "api_key": "sk-...", "default_model": "gpt-4o" } },
//!   "settings": { "show_response_time": false }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Setting key: maximum number of transcript entries a session keeps.
pub const SETTING_HISTORY_LIMIT: &str = "conversation_history_limit";
/// Setting key: persist conversations on exit.
pub const SETTING_AUTO_SAVE: &str = "auto_save_conversations";
/// Setting key: print the elapsed time after each reply.
pub const SETTING_SHOW_RESPONSE_TIME: &str = "show_response_time";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.chatcli/config.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Canonical name of the provider used when none is requested.
    pub default_provider: String,
    /// Per-provider credentials and preferences, keyed by canonical name.
    pub providers: BTreeMap<String, ProviderSettings>,
    /// Free-form user settings.
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: "openai".to_string(),
            providers: BTreeMap::new(),
            settings: default_settings(),
        }
    }
}

fn default_settings() -> BTreeMap<String, serde_json::Value> {
    let mut settings = BTreeMap::new();
    settings.insert(SETTING_HISTORY_LIMIT.to_string(), serde_json::json!(100));
    settings.insert(SETTING_AUTO_SAVE.to_string(), serde_json::json!(false));
    settings.insert(SETTING_SHOW_RESPONSE_TIME.to_string(), serde_json::json!(false));
    settings
}

impl Config {
    /// Look up a setting by key.
    pub fn get_setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }

    /// Read a boolean setting, treating missing or non-boolean values as `default`.
    pub fn bool_setting(&self, key: &str, default: bool) -> bool {
        self.get_setting(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(default)
    }

    /// Whether the shell should print the elapsed time after each reply.
    pub fn show_response_time(&self) -> bool {
        self.bool_setting(SETTING_SHOW_RESPONSE_TIME, false)
    }

    /// Settings for one provider, if any were saved.
    pub fn provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.get(name)
    }

    /// Settings for one provider, created empty on first access.
    pub fn provider_mut(&mut self, name: &str) -> &mut ProviderSettings {
        self.providers.entry(name.to_string()).or_default()
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Saved settings for a single provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    /// API key. Empty means "not configured".
    pub api_key: String,
    /// Model used when the user does not pick one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    /// Custom API base URL (overrides the provider's built-in endpoint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderSettings {
    /// Whether this provider has a saved API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
