//! The config store boundary consumed by the provider registry, and the
//! file-backed handle the CLI mutates.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::loader::{get_config_path, load_config, save_config};
use super::schema::Config;

/// Read-only view of persisted user preferences.
///
/// The registry only consults this as a fallback, after explicit arguments and
/// environment variables. Empty strings are reported as absent.
pub trait ConfigStore {
    /// Saved API key for a provider.
    fn get_api_key(&self, provider: &str) -> Option<String>;
    /// Saved default model for a provider.
    fn get_default_model(&self, provider: &str) -> Option<String>;
    /// Provider used when none is requested.
    fn get_default_provider(&self) -> String;
    /// Saved endpoint override for a provider.
    fn get_api_base(&self, _provider: &str) -> Option<String> {
        None
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ConfigStore for Config {
    fn get_api_key(&self, provider: &str) -> Option<String> {
        self.provider(provider).and_then(|p| non_empty(&p.api_key))
    }

    fn get_default_model(&self, provider: &str) -> Option<String> {
        self.provider(provider)
            .and_then(|p| p.default_model.as_deref())
            .and_then(non_empty)
    }

    fn get_default_provider(&self) -> String {
        if self.default_provider.is_empty() {
            "openai".to_string()
        } else {
            self.default_provider.clone()
        }
    }

    fn get_api_base(&self, provider: &str) -> Option<String> {
        self.provider(provider)
            .and_then(|p| p.api_base.as_deref())
            .and_then(non_empty)
    }
}

// ─────────────────────────────────────────────
// ConfigFile
// ─────────────────────────────────────────────

/// A loaded config bound to the file it came from.
///
/// Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    config: Config,
}

impl ConfigFile {
    /// Load from `path`, or the default location when `None`.
    pub fn open(path: Option<&Path>) -> Self {
        let path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
        let config = load_config(Some(&path));
        Self { path, config }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write the current state to disk.
    pub fn save(&self) -> std::io::Result<()> {
        save_config(&self.config, Some(&self.path))
    }

    pub fn set_api_key(&mut self, provider: &str, api_key: &str) -> std::io::Result<()> {
        self.config.provider_mut(provider).api_key = api_key.to_string();
        self.save()
    }

    pub fn set_default_provider(&mut self, provider: &str) -> std::io::Result<()> {
        self.config.default_provider = provider.to_string();
        self.save()
    }

    pub fn set_default_model(&mut self, provider: &str, model: &str) -> std::io::Result<()> {
        self.config.provider_mut(provider).default_model = Some(model.to_string());
        self.save()
    }

    pub fn set_setting(&mut self, key: &str, value: impl Serialize) -> std::io::Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        self.config.settings.insert(key.to_string(), value);
        self.save()
    }
}

impl ConfigStore for ConfigFile {
    fn get_api_key(&self, provider: &str) -> Option<String> {
        self.config.get_api_key(provider)
    }

    fn get_default_model(&self, provider: &str) -> Option<String> {
        self.config.get_default_model(provider)
    }

    fn get_default_provider(&self) -> String {
        self.config.get_default_provider()
    }

    fn get_api_base(&self, provider: &str) -> Option<String> {
        self.config.get_api_base(provider)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
