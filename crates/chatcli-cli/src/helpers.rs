//! Shared CLI helpers: response printing, banner, help.

use colored::Colorize;

use chatcli_providers::ProviderInfo;

use crate::commands::HELP;

/// Print an assistant reply to stdout.
pub fn print_response(speaker: &str, response: &str) {
    println!();
    println!("{}", format!("{speaker}:").cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else if response.starts_with("Error: ") {
        println!("{}", response.red());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print the banner shown when a chat session starts.
pub fn print_banner(info: &ProviderInfo) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}",
        format!("ChatCLI - {}", info.name.to_uppercase()).cyan().bold(),
        version.dimmed()
    );
    println!("{} {}", "Model:".bold(), info.model);
    println!("{}", "=".repeat(30).dimmed());
    print_help();
}

/// Print the list of slash commands.
pub fn print_help() {
    println!("{}", "Commands:".bold());
    for (usage, description) in HELP {
        println!("  {:<20} - {}", usage, description);
    }
    println!();
}

/// Print provider details for `/info`.
pub fn print_info(info: &ProviderInfo) {
    println!("{} {} ({})", "Provider:".bold(), info.name, info.display_name);
    println!("{} {}", "Current model:".bold(), info.model);
    println!(
        "{} {}",
        "Available models:".bold(),
        info.available_models.join(", ")
    );
}

/// Print an error line to stderr.
pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a "thinking" placeholder while a request is in flight.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

/// Format a duration as seconds with two decimals.
pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
