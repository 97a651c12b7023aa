//! Read-only listings: `--config`, `--list-providers`, `--list-models`.
//!
//! API keys are never printed, only whether one is available and from where.

use anyhow::Result;
use colored::Colorize;

use chatcli_core::config::{ConfigFile, ConfigStore};
use chatcli_core::utils::mask_secret;
use chatcli_providers::registry::{describe, CredentialSource, ALIASES, PROVIDERS};
use chatcli_providers::Resolver;

/// Describe where a provider's key would come from.
fn key_status(source: Option<CredentialSource>) -> String {
    match source {
        Some(CredentialSource::Environment) => format!("{} (env)", "✓ Configured".green()),
        Some(CredentialSource::Config) => format!("{} (config)", "✓ Configured".green()),
        Some(CredentialSource::Argument) => "✓ Configured".green().to_string(),
        None => "✗ Not configured".red().to_string(),
    }
}

/// Run `--config`.
pub fn show_config(config: &ConfigFile) {
    let resolver = Resolver::new().with_store(config);

    println!();
    println!("{}", "ChatCLI Configuration".cyan().bold());
    println!("{}", "=".repeat(30));

    let exists = config.path().exists();
    println!(
        "  {:<18} {} {}",
        "Config file:".bold(),
        config.path().display(),
        if exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!(
        "  {:<18} {}",
        "Default provider:".bold(),
        config.get_default_provider()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let model = config
            .get_default_model(spec.name)
            .unwrap_or_else(|| format!("{} (built-in)", spec.default_model));
        let saved_key = config
            .get_api_key(spec.name)
            .map(|key| format!(" [{}]", mask_secret(&key)).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "    {:<10} {}{} (model: {})",
            spec.name,
            key_status(resolver.credential_source(spec.name)),
            saved_key,
            model
        );
        if let Some(base) = config.get_api_base(spec.name) {
            println!("    {:<10} {} {}", "", "endpoint:".dimmed(), base);
        }
    }

    println!();
    println!("  {}", "Settings:".bold());
    for (key, value) in &config.config().settings {
        println!("    {key}: {value}");
    }
    println!();
}

/// Run `--list-providers`.
pub fn list_providers(config: &ConfigFile) {
    let resolver = Resolver::new().with_store(config);

    println!("Available providers:");
    for spec in PROVIDERS {
        let mark = if resolver.credential_source(spec.name).is_some() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {} {} - {}", mark, spec.name, spec.default_model);
    }

    println!();
    println!("Aliases:");
    for (alias, provider) in ALIASES {
        println!("  {alias} -> {provider}");
    }
}

/// Run `--list-models PROVIDER`.
pub fn list_models(provider: &str) -> Result<()> {
    for spec in describe(Some(provider))? {
        println!("Models for {}:", spec.name);
        println!("  Default: {}", spec.default_model);
        println!("  Available: {}", spec.available_models.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_models_unknown_provider() {
        assert!(list_models("mistral").is_err());
        assert!(list_models("xai").is_ok());
    }

    #[test]
    fn key_status_labels() {
        assert!(key_status(Some(CredentialSource::Environment)).contains("env"));
        assert!(key_status(Some(CredentialSource::Config)).contains("config"));
        assert!(key_status(None).contains("Not configured"));
    }
}
