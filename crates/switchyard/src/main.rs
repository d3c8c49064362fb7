// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - routes chat queries to a Databricks Genie Space or a
//! general-purpose model.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use switchyard_config::model::SwitchyardConfig;
use switchyard_core::SessionId;
use switchyard_security::{RedactingWriter, SecretRegistry};

use crate::app::{Answer, App};

/// Exit code for Genie failures that may succeed when resent (`EX_TEMPFAIL`).
const EXIT_RETRYABLE: i32 = 75;

/// Switchyard - Genie Space query routing.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a query and explain where it would be routed.
    Classify {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Route a query; data queries are answered by the Genie Space.
    Ask {
        /// Session id recorded in logs. Conversations are not kept between runs.
        #[arg(long)]
        session: Option<String>,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Launch an interactive session.
    Shell {
        #[arg(long)]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let secrets = SecretRegistry::new();
    if let Some(token) = &config.genie.token {
        secrets.register(token.clone());
    }
    init_tracing(&config.agent.log_level, secrets.clone());

    let code = match cli.command {
        Some(Commands::Classify { query }) => {
            classify(&config, &query.join(" "));
            0
        }
        Some(Commands::Ask { session, query }) => {
            ask(&config, secrets, session, &query.join(" ")).await
        }
        Some(Commands::Shell { session }) => match build_app(&config, secrets) {
            Some(app) => match shell::run_shell(app, session_id(session)).await {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    1
                }
            },
            None => 1,
        },
        None => {
            println!("switchyard: use --help for available commands");
            0
        }
    };
    std::process::exit(code);
}

fn classify(config: &SwitchyardConfig, query: &str) {
    let policy = switchyard_router::RoutingPolicy::new(config.routing.clone());
    let result = policy.classify(query);
    println!("category:   {}", result.category);
    println!("confidence: {:.2}", result.confidence);
    println!(
        "matches:    {} data, {} general ({})",
        result.data_matches, result.general_matches, result.reason
    );
    println!("{}", policy.explain(query));
}

async fn ask(
    config: &SwitchyardConfig,
    secrets: SecretRegistry,
    session: Option<String>,
    query: &str,
) -> i32 {
    let Some(app) = build_app(config, secrets) else {
        return 1;
    };
    let answer = app.handle(&session_id(session), query).await;
    match &answer {
        Answer::Genie(reply) => match reply.error_message() {
            None => println!("{}", reply.text),
            Some(message) => eprintln!("{}: {message}", "error".red()),
        },
        Answer::Model { reason } => println!("{}", reason.dimmed()),
        Answer::Unavailable { reason } => eprintln!("{}", reason.yellow()),
    }
    exit_code(&answer)
}

fn exit_code(answer: &Answer) -> i32 {
    match answer {
        Answer::Genie(reply) => match &reply.error {
            None => 0,
            Some(error) if error.is_retryable() => EXIT_RETRYABLE,
            Some(_) => 1,
        },
        Answer::Model { .. } => 0,
        Answer::Unavailable { .. } => 1,
    }
}

fn build_app(config: &SwitchyardConfig, secrets: SecretRegistry) -> Option<App> {
    App::from_config(config, secrets)
        .inspect_err(|e| eprintln!("{}: {e}", "error".red()))
        .ok()
}

fn session_id(explicit: Option<String>) -> SessionId {
    SessionId::from(explicit.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()))
}

/// Installs the global subscriber. `RUST_LOG` wins over `agent.log_level`.
/// Output goes to stderr through the secret redactor.
fn init_tracing(log_level: &str, secrets: SecretRegistry) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), secrets.clone()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Advancing the epoch only works when jemalloc is the allocator.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_ask_with_session() {
        let cli = Cli::try_parse_from([
            "switchyard", "ask", "--session", "s-1", "how", "many", "clients",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Ask { session, query }) => {
                assert_eq!(session.as_deref(), Some("s-1"));
                assert_eq!(query.join(" "), "how many clients");
            }
            other => panic!("expected ask, got {other:?}"),
        }
    }

    #[test]
    fn cli_requires_query_text() {
        assert!(Cli::try_parse_from(["switchyard", "classify"]).is_err());
    }

    #[test]
    fn transient_genie_failures_exit_with_tempfail() {
        use switchyard_genie::{GenieError, GenieReply};

        let reply = |error: Option<GenieError>| {
            Answer::Genie(GenieReply {
                text: String::new(),
                conversation_id: None,
                error,
            })
        };
        assert_eq!(exit_code(&reply(None)), 0);
        assert_eq!(exit_code(&reply(Some(GenieError::RateLimited))), EXIT_RETRYABLE);
        assert_eq!(exit_code(&reply(Some(GenieError::TimedOut))), EXIT_RETRYABLE);
        assert_eq!(
            exit_code(&reply(Some(GenieError::Transport("HTTP 502".into())))),
            EXIT_RETRYABLE
        );
        assert_eq!(exit_code(&reply(Some(GenieError::Expired))), 1);
        assert_eq!(exit_code(&reply(Some(GenieError::Service("bad sql".into())))), 1);
        assert_eq!(exit_code(&Answer::Unavailable { reason: "off".into() }), 1);
        assert_eq!(exit_code(&Answer::Model { reason: "general".into() }), 0);
    }

    #[test]
    fn generated_session_ids_are_unique() {
        assert_ne!(session_id(None), session_id(None));
        assert_eq!(session_id(Some("fixed".into())).as_str(), "fixed");
    }
}
