//! Interactive chat shell.
//!
//! Uses `rustyline` for readline-style editing with persistent history. One
//! provider is live at a time; `/switch` replaces it and its history is lost.

use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use chatcli_core::config::{ConfigFile, ConfigStore};
use chatcli_core::utils::get_history_path;
use chatcli_providers::registry::{lookup, provider_names, resolve_name};
use chatcli_providers::{ChatError, Conversation, Resolver};

use crate::commands::{self, Command};
use crate::helpers;

const HISTORY_SIZE: usize = 1000;

/// Start a conversation with `provider` (or the configured default).
pub async fn run(config: &ConfigFile, provider: Option<String>, model: Option<String>) -> Result<()> {
    let provider = provider.unwrap_or_else(|| config.get_default_provider());
    let mut conversation = open(config, &provider, model.as_deref())
        .with_context(|| format!("failed to start chat with {provider}"))?;

    helpers::print_banner(&conversation.info());

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                helpers::print_error(format!("Input error: {e}"));
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        if let Some(command) = commands::parse(trimmed) {
            if !handle_command(config, &mut conversation, command) {
                break;
            }
            continue;
        }

        debug!(provider = conversation.name(), input = trimmed, "processing input");
        helpers::print_thinking();
        let started = Instant::now();
        let response = conversation.converse(trimmed).await;
        let elapsed = started.elapsed();
        helpers::clear_thinking();

        helpers::print_response(conversation.display_name(), &response);
        if config.config().show_response_time() {
            println!("{}\n", format!("({})", helpers::format_elapsed(elapsed)).dimmed());
        }
    }

    save_history(&mut editor);
    Ok(())
}

/// Build a conversation for `name`, using config for the key and default model.
///
/// A saved default model the provider no longer offers is ignored.
pub fn open(
    config: &dyn ConfigStore,
    name: &str,
    model: Option<&str>,
) -> Result<Conversation, ChatError> {
    let spec = lookup(name)?;
    let model = match model {
        Some(model) => Some(model.to_string()),
        None => config.get_default_model(spec.name).filter(|saved| {
            let ok = spec.supports_model(saved);
            if !ok {
                warn!(provider = spec.name, model = %saved, "Ignoring unavailable default model");
            }
            ok
        }),
    };

    Resolver::new()
        .with_store(config)
        .create(&resolve_name(name), None, model.as_deref())
}

/// Apply a slash command. Returns `false` when the shell should exit.
fn handle_command(config: &ConfigFile, conversation: &mut Conversation, command: Command) -> bool {
    match command {
        Command::Quit => {
            println!("Goodbye!");
            return false;
        }
        Command::Clear => {
            conversation.clear();
            println!("Conversation history cleared.");
        }
        Command::Switch(None) => {
            println!("Usage: /switch <provider>");
            println!("Available providers: {}", provider_names().join(", "));
        }
        Command::Switch(Some(name)) => match open(config, &name, None) {
            Ok(next) => {
                *conversation = next;
                println!(
                    "Switched to {} ({})",
                    conversation.name(),
                    conversation.model()
                );
            }
            Err(e) => helpers::print_error(format!("Error switching provider: {e}")),
        },
        Command::Model(None) => {
            let info = conversation.info();
            println!("Current model: {}", info.model);
            println!("Available models: {}", info.available_models.join(", "));
        }
        Command::Model(Some(model)) => match conversation.set_model(&model) {
            Ok(()) => println!("Switched to model: {model}"),
            Err(e) => helpers::print_error(format!("Error switching model: {e}")),
        },
        Command::Info => helpers::print_info(&conversation.info()),
        Command::Help => {
            println!();
            helpers::print_help();
        }
        Command::Unknown(name) => {
            println!("Unknown command: /{name}");
            println!("Type /help for available commands");
        }
    }
    true
}

/// Line editor preloaded with `~/.chatcli/history`.
fn create_editor() -> Result<DefaultEditor> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(HISTORY_SIZE)?;

    let history = get_history_path();
    match editor.load_history(&history) {
        Ok(()) => debug!(path = %history.display(), "REPL history loaded"),
        Err(e) => debug!(path = %history.display(), error = %e, "no REPL history loaded"),
    }
    Ok(editor)
}

fn save_history(editor: &mut DefaultEditor) {
    let history = get_history_path();
    let saved = history
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .map_err(ReadlineError::from)
        .and_then(|()| editor.save_history(&history));
    if let Err(e) = saved {
        warn!(path = %history.display(), error = %e, "failed to save REPL history");
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
