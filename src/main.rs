use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tributary::app::AppContext;
use tributary::cli::{commands, Cli, Commands};
use tributary::config::Config;
use tributary::store::SourceRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Commands::Sync { .. } => {
            let ctx = AppContext::new(config)?;
            commands::sync(&ctx).await?;
        }
        Commands::Add { ref url, ref id } => {
            let registry = SourceRegistry::new(&config.sources.dir);
            commands::add_source(&registry, url, id.as_deref())?;
        }
        Commands::List => {
            let registry = SourceRegistry::new(&config.sources.dir);
            commands::list_sources(&registry)?;
        }
    }

    Ok(())
}
