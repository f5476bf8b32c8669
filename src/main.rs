//! datasight CLI entry point.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log filter priority: RUST_LOG env var, then the --log-level argument,
/// then "info".
fn init_tracing(cli_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(cli_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = datasight::cli::parse_cli();
    init_tracing(&cli.log_level);
    datasight::cli::run_with_cli(cli).await
}
