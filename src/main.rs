use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchbook::cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    run_cli().await
}
