//! `chatcli --setup` and `--configure-defaults`: interactive configuration.
//!
//! Every accepted answer is written to the config file immediately.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use chatcli_core::config::ConfigFile;
use chatcli_providers::registry::{provider_names, resolve_name, validate_provider, PROVIDERS};
use chatcli_providers::Resolver;

/// Line-oriented prompt over rustyline.
struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Ask a question; the trimmed answer, empty when the user just pressed Enter.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(line.trim().to_string()),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                bail!("setup cancelled")
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

fn write_error(config: &ConfigFile) -> String {
    format!("failed to write {}", config.path().display())
}

/// Run the API key setup wizard.
pub fn run(config: &mut ConfigFile) -> Result<()> {
    println!();
    println!("{}", "ChatCLI Configuration Setup".cyan().bold());
    println!("{}", "=".repeat(30));
    println!("Configure API keys for LLM providers");
    println!("{}", "(Press Enter to skip a provider)".dimmed());
    println!();

    let mut prompter = Prompter::new()?;

    for spec in PROVIDERS {
        let configured = Resolver::new()
            .with_store(&*config)
            .credential_source(spec.name)
            .is_some();
        if configured {
            println!("  {} {}: Already configured", "✓".green(), spec.display_name);
            let update = prompter.ask(&format!("Update {} API key? (y/N): ", spec.display_name))?;
            if !is_yes(&update) {
                continue;
            }
        }

        let api_key = prompter.ask(&format!("Enter {} API key: ", spec.display_name))?;
        if !api_key.is_empty() {
            config
                .set_api_key(spec.name, &api_key)
                .with_context(|| write_error(config))?;
            println!("  {} {} API key saved.", "✓".green(), spec.display_name);
        }
        println!();
    }

    println!("Available providers: {}", provider_names().join(", "));
    let current = config.config().default_provider.clone();
    let answer = prompter.ask(&format!("Default provider (current: {current}): "))?;
    if !answer.is_empty() {
        if validate_provider(&answer) {
            config
                .set_default_provider(&resolve_name(&answer))
                .with_context(|| write_error(config))?;
        } else {
            println!("  {} Invalid provider: {}", "✗".red(), answer);
        }
    }

    println!();
    println!("{}", "Configuration saved!".green());
    println!("Config file: {}", config.path().display());
    Ok(())
}

/// Interactive configuration of the default provider and per-provider models.
pub fn configure_defaults(config: &mut ConfigFile) -> Result<()> {
    println!();
    println!("{}", "ChatCLI Default Configuration".cyan().bold());
    println!("{}", "=".repeat(30));

    let mut prompter = Prompter::new()?;

    println!("Available providers: {}", provider_names().join(", "));
    println!(
        "Current default provider: {}",
        config.config().default_provider
    );
    let answer = prompter.ask("Set new default provider (press Enter to keep current): ")?;
    if !answer.is_empty() {
        if validate_provider(&answer) {
            let canonical = resolve_name(&answer);
            config
                .set_default_provider(&canonical)
                .with_context(|| write_error(config))?;
            println!("  Default provider set to: {canonical}");
        } else {
            println!("  {} Invalid provider: {}", "✗".red(), answer);
        }
    }

    println!();
    println!("Configure default models for each provider:");

    for spec in PROVIDERS {
        let current = config
            .config()
            .provider(spec.name)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| spec.default_model.to_string());

        println!();
        println!("{}:", spec.display_name.bold());
        println!("  Current default: {current}");
        println!("  Available models: {}", spec.available_models.join(", "));

        let model = prompter.ask(&format!(
            "  Set default model for {} (press Enter to keep current): ",
            spec.name
        ))?;
        if model.is_empty() {
            continue;
        }
        if spec.supports_model(&model) {
            config
                .set_default_model(spec.name, &model)
                .with_context(|| write_error(config))?;
            println!("  Default model for {} set to: {}", spec.name, model);
        } else {
            println!("  {} Invalid model for {}: {}", "✗".red(), spec.name, model);
        }
    }

    println!();
    println!("{}", "Configuration saved!".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes("Y"));
        assert!(is_yes("yes"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("sure"));
    }
}
