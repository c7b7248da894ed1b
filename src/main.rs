//! Postbot CLI entry point.

use anyhow::Result;
use clap::Parser;
use postbot::cli::{commands, Cli, Commands};
use postbot::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("postbot={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration (file, then PROJECT_ID / LOCATION / KEY overrides)
    let config_path = Settings::resolve_path(cli.config.as_deref().map(PathBuf::from).as_ref());
    let settings = Settings::load_from(Some(&config_path))?;

    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Videos { location } => {
            commands::run_videos(location, settings).await?;
        }

        Commands::Location {
            location,
            name,
            full_address,
        } => {
            commands::run_location(location, name.as_deref(), full_address.as_deref(), settings)
                .await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, &config_path)?;
        }
    }

    Ok(())
}
