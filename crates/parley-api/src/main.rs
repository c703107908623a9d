//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, ConfigCommand};
use parley_observe::tracing_setup::{
    filter_for_verbosity, init_tracing, otel_requested, shutdown_tracing,
};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The server logs requests at info unless asked otherwise
    let filter = match cli.command {
        Commands::Serve { .. } if cli.verbose == 0 && !cli.quiet => "info",
        _ => filter_for_verbosity(cli.quiet, cli.verbose),
    };
    init_tracing(filter, otel_requested())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let result = run(cli, state).await;

    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::New { title } => {
            cli::conversation::new_conversation(&state, title.as_deref(), cli.json).await?;
        }

        Commands::List => {
            cli::conversation::list_conversations(&state, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::conversation::show_conversation(&state, id, cli.json).await?;
        }

        Commands::Rename { id, title } => {
            cli::conversation::rename_conversation(&state, id, &title, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::conversation::delete_conversation(&state, id, force, cli.json).await?;
        }

        Commands::Send { id, content } => {
            cli::conversation::send_message(&state, id, &content, cli.json).await?;
        }

        Commands::Config { action } => match action {
            ConfigCommand::Show => {
                cli::config::show_config(&state, cli.json).await?;
            }
            ConfigCommand::Set { key, value } => {
                cli::config::set_config(&state, key, &value, cli.json).await?;
            }
            ConfigCommand::SetKey { value } => {
                cli::config::set_key(&state, value.as_deref(), cli.json).await?;
            }
            ConfigCommand::Validate => {
                cli::config::validate(&state, cli.json).await?;
            }
        },

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let router = http::router::build_router(state);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Parley API listening on {}",
                console::style("💬").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
