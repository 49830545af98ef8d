pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod models;
pub mod search;
pub mod services;
pub mod state;
pub mod view;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use state::AppState;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Init)) {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config)?;

    if config.catalog.api_token.is_empty() {
        warn!("TMDB_API_KEY is not set; catalog requests will be rejected");
    }

    let state = AppState::from_config(config)?;
    info!("cinefind starting");

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => cli::cmd_interactive(&state).await,
        Commands::Search { query, pages } => {
            let query = query.join(" ");
            cli::cmd_search(&state, &query, pages.max(1)).await
        }
        Commands::Discover { pages } => cli::cmd_discover(&state, pages.max(1)).await,
        Commands::Trending { limit } => cli::cmd_trending(&state, limit).await,
        Commands::Poster { url } => {
            cli::cmd_poster(&state, url.as_deref());
            Ok(())
        }
        Commands::Init => Ok(()),
    }
}

/// Logs go to stderr so they never interleave with the rendered screen.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
