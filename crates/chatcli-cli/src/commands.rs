//! Slash commands understood by the interactive shell.

/// A parsed `/command`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Clear,
    /// `/switch [provider]`
    Switch(Option<String>),
    /// `/model [model]`
    Model(Option<String>),
    Info,
    Help,
    Unknown(String),
}

/// Help text shown at startup and by `/help`.
pub const HELP: &[(&str, &str)] = &[
    ("/quit, /exit, /q", "Exit chat"),
    ("/clear", "Clear conversation"),
    ("/switch <provider>", "Switch provider"),
    ("/model <model>", "Switch model"),
    ("/info", "Provider info"),
    ("/help", "Show commands"),
];

/// Parse a line of input. Returns `None` for ordinary chat text.
pub fn parse(input: &str) -> Option<Command> {
    let rest = input.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("").to_lowercase();
    let arg = parts.next().map(String::from);

    Some(match name.as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "clear" => Command::Clear,
        "switch" => Command::Switch(arg),
        "model" => Command::Model(arg),
        "info" => Command::Info,
        "help" => Command::Help,
        _ => Command::Unknown(name),
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
