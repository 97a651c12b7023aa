//! ChatCLI: entry point.
//!
//! # Modes
//!
//! - `chatcli [--provider P] [--model M]`: interactive chat (default)
//! - `chatcli --setup` / `--configure-defaults`: interactive configuration
//! - `chatcli --config`, `--list-providers`, `--list-models P`: read-only listings
//! - `chatcli --set-default-provider P`, `--set-default-model P M`: one-shot config edits

mod commands;
mod helpers;
mod repl;
mod setup;
mod status;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use colored::Colorize;

use chatcli_core::config::ConfigFile;
use chatcli_providers::registry::{self, lookup, resolve_name};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

const EXAMPLES: &str = "\
Examples:
  chatcli                                    # Use default provider
  chatcli --provider openai                  # Use OpenAI
  chatcli --claude                           # Use Claude (shortcut)
  chatcli --provider gemini --model gemini-2.0-flash
  chatcli --setup                            # Interactive setup for API keys
  chatcli --configure-defaults               # Configure default provider and models
  chatcli --set-default-provider claude      # Set Claude as default provider
  chatcli --set-default-model openai gpt-4o  # Set GPT-4o as default for OpenAI
  chatcli --config                           # Show current configuration
  chatcli --list-providers                   # Show providers";

/// ChatCLI: multi-LLM terminal chat
#[derive(Parser, Debug)]
#[command(name = "chatcli", version, about, long_about = None, after_help = EXAMPLES)]
struct Cli {
    /// Interactive setup for API keys
    #[arg(long)]
    setup: bool,

    /// Show current configuration
    #[arg(long)]
    config: bool,

    /// Interactive configuration for default provider and models
    #[arg(long)]
    configure_defaults: bool,

    /// Set the default provider
    #[arg(long, value_name = "PROVIDER")]
    set_default_provider: Option<String>,

    /// Set default model for a provider
    #[arg(long, num_args = 2, value_names = ["PROVIDER", "MODEL"])]
    set_default_model: Option<Vec<String>>,

    /// LLM provider to use (openai, deepseek, claude, gemini, grok)
    #[arg(long)]
    provider: Option<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// List available providers
    #[arg(long)]
    list_providers: bool,

    /// List models for a provider
    #[arg(long, value_name = "PROVIDER")]
    list_models: Option<String>,

    #[command(flatten)]
    shortcuts: Shortcuts,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

/// Provider shortcuts. At most one may be given.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
struct Shortcuts {
    /// Use OpenAI (shortcut)
    #[arg(long)]
    openai: bool,
    /// Use GPT-4o (shortcut)
    #[arg(long)]
    gpt4: bool,
    /// Use GPT-4o-mini (shortcut)
    #[arg(long)]
    gpt4_mini: bool,
    /// Use Claude (shortcut)
    #[arg(long)]
    claude: bool,
    /// Use Gemini (shortcut)
    #[arg(long)]
    gemini: bool,
    /// Use DeepSeek (shortcut)
    #[arg(long)]
    deepseek: bool,
    /// Use DeepSeek Reasoner (shortcut)
    #[arg(long)]
    reasoner: bool,
    /// Use Grok (shortcut)
    #[arg(long)]
    grok: bool,
}

impl Shortcuts {
    /// The provider and (optional) model a shortcut selects.
    fn selection(&self) -> Option<(&'static str, Option<&'static str>)> {
        let table = [
            (self.openai, "openai", None),
            (self.gpt4, "openai", Some("gpt-4o")),
            (self.gpt4_mini, "openai", Some("gpt-4o-mini")),
            (self.claude, "claude", None),
            (self.gemini, "gemini", None),
            (self.deepseek, "deepseek", None),
            (self.reasoner, "deepseek", Some("deepseek-reasoner")),
            (self.grok, "grok", None),
        ];
        table
            .into_iter()
            .find(|(set, _, _)| *set)
            .map(|(_, provider, model)| (provider, model))
    }
}

impl Cli {
    /// Provider and model for the chat session. `--model` beats a shortcut's model;
    /// a shortcut beats `--provider`.
    fn chat_target(&self) -> (Option<String>, Option<String>) {
        match self.shortcuts.selection() {
            Some((provider, model)) => (
                Some(provider.to_string()),
                self.model.clone().or(model.map(String::from)),
            ),
            None => (self.provider.clone(), self.model.clone()),
        }
    }
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let mut config = ConfigFile::open(None);

    if cli.setup {
        return setup::run(&mut config);
    }
    if cli.config {
        status::show_config(&config);
        return Ok(());
    }
    if cli.configure_defaults {
        return setup::configure_defaults(&mut config);
    }
    if let Some(provider) = &cli.set_default_provider {
        return set_default_provider(&mut config, provider);
    }
    if let Some(args) = &cli.set_default_model {
        // clap guarantees exactly two values
        if let [provider, model] = args.as_slice() {
            return set_default_model(&mut config, provider, model);
        }
    }
    if cli.list_providers {
        status::list_providers(&config);
        return Ok(());
    }
    if let Some(provider) = &cli.list_models {
        return status::list_models(provider);
    }

    let (provider, model) = cli.chat_target();
    repl::run(&config, provider, model).await
}

// ─────────────────────────────────────────────
// One-shot config edits
// ─────────────────────────────────────────────

fn set_default_provider(config: &mut ConfigFile, provider: &str) -> Result<()> {
    if !registry::validate_provider(provider) {
        bail!(
            "Invalid provider: {provider}. Available providers: {}",
            registry::provider_names().join(", ")
        );
    }
    let canonical = resolve_name(provider);
    config
        .set_default_provider(&canonical)
        .with_context(|| format!("failed to write {}", config.path().display()))?;
    println!("{} Default provider set to: {}", "✓".green(), canonical);
    Ok(())
}

fn set_default_model(config: &mut ConfigFile, provider: &str, model: &str) -> Result<()> {
    let spec = lookup(provider)?;
    if !spec.supports_model(model) {
        bail!(
            "Invalid model for {}: {model}. Available models: {}",
            spec.name,
            spec.available_models.join(", ")
        );
    }
    config
        .set_default_model(spec.name, model)
        .with_context(|| format!("failed to write {}", config.path().display()))?;
    println!(
        "{} Default model for {} set to: {}",
        "✓".green(),
        spec.name,
        model
    );
    Ok(())
}

/// Initialize tracing/logging. Logs go to stderr.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chatcli_cli=debug,chatcli_providers=debug,chatcli_core=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
