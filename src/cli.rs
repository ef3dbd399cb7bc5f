use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::router;
use crate::state::AppState;
use crate::utils::shutdown_token;

/// CLI for the matching engine server.
#[derive(Parser)]
#[command(name = "matchbook")]
#[command(version, about = "A multi-symbol limit order book matching engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the order submission and market data server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { addr } => serve(&addr).await,
    }
}

async fn serve(addr: &str) -> anyhow::Result<()> {
    let state = AppState::new();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "matching engine listening");

    let token = shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await?;
    Ok(())
}
