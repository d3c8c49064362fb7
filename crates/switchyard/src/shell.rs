// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard shell` command implementation.
//!
//! Interactive REPL bound to one session, so follow-up data questions
//! continue the same Genie conversation.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use switchyard_core::{SessionId, SwitchyardError};
use tracing::info;

use crate::app::{Answer, App};

/// Shell command, parsed from one input line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Clear,
    Explain(&'a str),
    Query(&'a str),
    Empty,
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    match trimmed {
        "" => Command::Empty,
        "/quit" | "/exit" => Command::Quit,
        "/clear" => Command::Clear,
        _ => match trimmed.strip_prefix("/explain ") {
            Some(query) => Command::Explain(query.trim()),
            None => Command::Query(trimmed),
        },
    }
}

/// Runs the `switchyard shell` interactive REPL.
pub async fn run_shell(app: App, session: SessionId) -> Result<(), SwitchyardError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| SwitchyardError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "switchyard shell".bold().green());
    if app.genie().is_none() {
        println!("{}", "Genie Space not configured; data queries will be refused.".yellow());
    }
    println!(
        "Type {} to start a new Genie conversation, {} to exit.\n",
        "/clear".yellow(),
        "/quit".yellow()
    );
    info!(session = %session, "shell session started");

    let prompt = format!("{}> ", "switchyard".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_command(&line);
                if command != Command::Empty {
                    let _ = rl.add_history_entry(&line);
                }
                match command {
                    Command::Empty => continue,
                    Command::Quit => break,
                    Command::Clear => {
                        if app.clear(&session) {
                            println!("{}", "conversation cleared".dimmed());
                        } else {
                            println!("{}", "no active conversation".dimmed());
                        }
                    }
                    Command::Explain(query) => println!("{}", app.policy().explain(query)),
                    Command::Query(query) => print_answer(app.handle(&session, query).await),
                }
            }
            // Ctrl+C, Ctrl+D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn print_answer(answer: Answer) {
    match answer {
        Answer::Genie(reply) => match reply.error_message() {
            None => println!("{}\n", reply.text),
            Some(message) => eprintln!("{}: {message}\n", "error".red()),
        },
        Answer::Model { reason } => println!("{}\n", reason.dimmed()),
        Answer::Unavailable { reason } => eprintln!("{}\n", reason.yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shell_commands() {
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/exit "), Command::Quit);
        assert_eq!(parse_command("/clear"), Command::Clear);
        assert_eq!(
            parse_command("/explain how many clients"),
            Command::Explain("how many clients")
        );
        assert_eq!(parse_command(" how many clients "), Command::Query("how many clients"));
        // Route overrides are queries, handled by the router.
        assert_eq!(parse_command("/genie hello"), Command::Query("/genie hello"));
    }
}
