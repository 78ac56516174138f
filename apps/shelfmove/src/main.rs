//! shelfmove command line entry point.

mod app;
mod cli;
mod config;
mod terminal;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the outcome.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse_args();

    let mut config = config::Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    tracing::debug!(service = %config.service_url, "configuration loaded");

    let batch = cli.batch()?;

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(app::run(config, batch))?;

    println!("{}", serde_json::to_string(&outcome)?);
    std::process::exit(app::exit_code(&outcome));
}
