//! CLI entry point.
//!
//! Bootstraps the [`CliContext`](rolechat_cli::CliContext) once and routes
//! each command to its handler.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use rolechat_cli::{Cli, CliConfig, CliError, Commands, HistoryMode, bootstrap, handlers};
use rolechat_core::SessionKey;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli)?;

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(config).await?;

    match command {
        Commands::Chat {
            instruction,
            session,
            memory,
        } => {
            let mode = HistoryMode::from_args(memory, session);
            handlers::chat::execute(&ctx, instruction.as_deref(), mode).await?;
        }
        Commands::Roleplay(args) => {
            handlers::roleplay::execute(&ctx, &args).await?;
        }
        Commands::Sessions { kind } => {
            handlers::sessions::list(&ctx, kind.map(Into::into)).await?;
        }
        Commands::History { kind, id, limit } => {
            handlers::sessions::history(&ctx, SessionKey::new(kind.into(), id), limit).await?;
        }
        Commands::Clear {
            kind,
            id,
            delete,
            force,
        } => {
            handlers::sessions::clear(&ctx, SessionKey::new(kind.into(), id), delete, force)
                .await?;
        }
    }

    Ok(())
}
