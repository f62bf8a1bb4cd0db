//! ragdesk CLI and REST API entry point.
//!
//! Binary name: `rdesk`
//!
//! Parses CLI arguments, wires providers and vector stores, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::warn;

use ragdesk_observe::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands, FaqCommand, ProductCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the verbosity flags.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,ragdesk_core=debug,ragdesk_infra=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.log_format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "rdesk", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let json = cli.json;

    match cli.command {
        Commands::Ask {
            question,
            top_n,
            explain,
        } => {
            cli::ask::ask(&state, &question, top_n, explain, json).await?;
        }

        Commands::Product { action } => match action {
            ProductCommand::List => cli::product::list(&state, json).await?,
            ProductCommand::Show { id } => cli::product::show(&state, &id, json).await?,
            ProductCommand::Add {
                name,
                price,
                quantity,
            } => cli::product::add(&state, name, price, quantity, json).await?,
            ProductCommand::Update {
                id,
                name,
                price,
                quantity,
            } => cli::product::update(&state, &id, name, price, quantity, json).await?,
            ProductCommand::Delete { id } => cli::product::delete(&state, &id, json).await?,
            ProductCommand::Search { query, top_n } => {
                cli::product::search(&state, &query, top_n, json).await?
            }
            ProductCommand::Reembed { id } => cli::product::reembed(&state, &id, json).await?,
        },

        Commands::Faq { action } => match action {
            FaqCommand::Ask { question, top_n } => {
                cli::faq::ask(&state, &question, top_n, json).await?
            }
            FaqCommand::List => cli::faq::list(&state, json).await?,
            FaqCommand::Show { id } => cli::faq::show(&state, &id, json).await?,
            FaqCommand::Add { question, answer } => {
                cli::faq::add(&state, question, answer, json).await?
            }
            FaqCommand::Update {
                id,
                question,
                answer,
            } => cli::faq::update(&state, &id, question, answer, json).await?,
            FaqCommand::Delete { id } => cli::faq::delete(&state, &id, json).await?,
            FaqCommand::Search { query, top_n } => {
                cli::faq::search(&state, &query, top_n, json).await?
            }
        },

        Commands::Seed => {
            cli::seed::seed(&state, json).await?;
        }

        Commands::Reindex { corpus, all } => {
            cli::reindex::reindex(&state, corpus, all, json, cli.quiet).await?;
        }

        Commands::Status { ping } => {
            cli::status::status(&state, ping, json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} ragdesk API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
