//! Interactive terminal host for the parley panel.
//!
//! This binary provides a REPL that drives a panel session against a chat
//! backend: type a question, or attach a file and ask about it.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! parley-chat
//!
//! # Point at a backend
//! parley-chat --endpoint https://chat.example.com/api/chat
//!
//! # Load settings from a file
//! parley-chat --config panel.yaml
//!
//! # Disable colors (useful for piping output)
//! parley-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/file <path>` - Attach a file to the next submission
//! - `/remove` - Remove the attached file
//! - `/clear` - Start a new conversation
//! - `/stats` - Show session statistics
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use std::sync::atomic::Ordering;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use utf8path::Path;

use parley::panel::{PanelArgs, PanelCommand, PanelConfig, PanelSession, help_text, parse_command};
use parley::{ChatClient, PendingUpload, PlainTextRenderer, Renderer, Role, Submission};

/// Main entry point for the parley-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = PanelArgs::from_command_line_relaxed("parley-chat [OPTIONS]");
    let mut config = match &args.config {
        Some(path) => PanelConfig::load(path)?,
        None => PanelConfig::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }
    if args.no_color {
        config.use_color = false;
    }
    let use_color = config.use_color;

    let client = ChatClient::new(config.endpoint.clone())?;
    println!("Parley Chat (endpoint: {})", client.endpoint());
    println!("Type /help for commands, /quit to exit\n");

    let mut session = PanelSession::new(client, config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling during streaming
    let interrupted = session.stop_handle();

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        PanelCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        PanelCommand::AttachFile(path) => {
                            attach_file(&mut session, &mut renderer, &path);
                        }
                        PanelCommand::RemoveFile => {
                            session.remove_file();
                            renderer.print_info("Attachment removed.");
                        }
                        PanelCommand::Clear => {
                            session.new_conversation();
                            renderer.print_info("Conversation cleared.");
                        }
                        PanelCommand::Stats => {
                            print_stats(&session);
                        }
                        PanelCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        PanelCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular input - submit to the backend
                session.set_input(line);
                let before = session.message_count();
                match session.submit().await {
                    Submission::Ignored => {
                        renderer.print_info("Nothing to send.");
                    }
                    Submission::Completed => {
                        println!("Assistant:");
                        for message in &session.messages()[before..] {
                            if message.role == Role::Assistant {
                                renderer.print_text(&message.content);
                                renderer.print_text("\n");
                            }
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn attach_file(
    session: &mut PanelSession<ChatClient>,
    renderer: &mut PlainTextRenderer,
    path: &str,
) {
    let path = Path::from(path);
    let upload = match PendingUpload::load(&path) {
        Ok(upload) => upload,
        Err(err) => {
            renderer.print_error(&err.to_string());
            return;
        }
    };
    let icon = upload.category().icon();
    let description = upload.category().description();
    let name = upload.name.clone();
    let size_kb = upload.size_bytes() as f64 / 1024.0;
    match session.attach_file(upload) {
        Ok(()) => {
            renderer.print_info(&format!(
                "{icon} {name} ({description}, {size_kb:.1}KB) attached"
            ));
        }
        Err(_) => {
            if let Some(warning) = session.file_error() {
                let warning = warning.to_string();
                renderer.print_warning(&warning);
            }
        }
    }
}

fn print_stats(session: &PanelSession<ChatClient>) {
    println!("    Session Statistics:");
    println!("      Messages: {}", session.message_count());
    match session.pending_upload() {
        Some(upload) => println!(
            "      Attachment: {} ({}, {:.1}KB)",
            upload.name,
            upload.category().description(),
            upload.size_bytes() as f64 / 1024.0
        ),
        None => println!("      Attachment: (none)"),
    }
    match session.config().endpoint.as_deref() {
        Some(endpoint) => println!("      Endpoint: {}", endpoint),
        None => println!("      Endpoint: (default)"),
    }
    match session.file_error() {
        Some(warning) => println!("      Warning: {}", warning),
        None => println!("      Warning: (none)"),
    }
}
