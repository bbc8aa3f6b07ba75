//! Slash command parsing for the panel host.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the panel session without submitting a query.

/// A parsed panel command.
///
/// These commands control the session and are never sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    /// Attach a file from the given path.
    AttachFile(String),

    /// Remove the attached file.
    RemoveFile,

    /// Clear the conversation and transient state.
    Clear,

    /// Display session statistics (message count, pending file, etc.).
    Stats,

    /// Display help information.
    Help,

    /// Exit the application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(PanelCommand)` if the input is a command,
/// or `None` if it should be treated as a regular submission.
///
/// # Examples
///
/// ```
/// # use parley::panel::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/file report.pdf").is_some());
/// assert!(parse_command("What is a monad?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<PanelCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "file" | "attach" => match argument {
            Some(path) => PanelCommand::AttachFile(path.to_string()),
            None => PanelCommand::Invalid("/file requires a path".to_string()),
        },
        "remove" => PanelCommand::RemoveFile,
        "clear" => PanelCommand::Clear,
        "stats" => PanelCommand::Stats,
        "help" | "?" => PanelCommand::Help,
        "quit" | "exit" => PanelCommand::Quit,
        unknown => PanelCommand::Invalid(format!(
            "Unknown command: /{unknown} (try /help)"
        )),
    };
    Some(result)
}

/// Help text describing the available commands.
pub fn help_text() -> &'static str {
    "Available commands:\n\
     /file <path>   - Attach a file to the next submission\n\
     /remove        - Remove the attached file\n\
     /clear         - Start a new conversation\n\
     /stats         - Show session statistics\n\
     /help          - Show this help\n\
     /quit          - Exit"
}
