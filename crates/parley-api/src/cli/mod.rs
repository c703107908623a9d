//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Conversation commands sit
//! at the top level (`parley new`, `parley send 3 "hi"`); runtime settings
//! live under `parley config`.

pub mod config;
pub mod conversation;
pub mod status;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use parley_types::chat::ConversationId;
use parley_types::config::ConfigKey;

/// Chat with a GLM model from your terminal.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new conversation.
    New {
        /// Conversation title (defaults to "New Conversation").
        title: Option<String>,
    },

    /// List conversations, most recently active first.
    #[command(alias = "ls")]
    List,

    /// Show a conversation and its transcript.
    Show {
        /// Conversation id.
        id: ConversationId,
    },

    /// Rename a conversation.
    Rename {
        /// Conversation id.
        id: ConversationId,

        /// New title.
        title: String,
    },

    /// Delete a conversation and all its messages.
    #[command(alias = "rm")]
    Delete {
        /// Conversation id.
        id: ConversationId,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Send a message and print the assistant's reply.
    Send {
        /// Conversation id.
        id: ConversationId,

        /// Message text.
        content: String,
    },

    /// Inspect and change runtime settings.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// System status dashboard.
    Status,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (API key redacted).
    Show,

    /// Override a setting. An empty value reverts it to the default.
    Set {
        /// Setting name (api_key, model, temperature, max_tokens,
        /// max_history_rounds, system_prompt).
        key: ConfigKey,

        /// New value.
        value: String,
    },

    /// Store a new API key after checking it against the provider.
    #[command(name = "set-key")]
    SetKey {
        /// Key value (optional; prompts if omitted for security).
        #[arg(long)]
        value: Option<String>,
    },

    /// Check whether the configured API key is accepted.
    Validate,
}

/// Spinner for a slow operation; hidden in JSON mode so stdout stays parseable.
pub(crate) fn spinner(message: String, json: bool) -> anyhow::Result<ProgressBar> {
    if json {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}
