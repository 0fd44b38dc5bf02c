//! Reqres Client - fetch users from the reqres directory API
//!
//! Builds the cached, retrying user service from config and command-line
//! arguments and runs the requested command against it.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reqres_client::app::{build_service, App};
use reqres_client::cli::{Cli, StartupConfig};

/// Sets up the log subscriber; `RUST_LOG` wins over the default filter
fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let startup = StartupConfig::from_cli(&cli)?;

    init_logging(startup.log_filter());
    tracing::debug!(base_url = %startup.api.base_url, ttl_secs = startup.api.cache_duration_seconds, "starting");

    let app = App::new(build_service(&startup)?);
    let output = app.run(&startup.command).await?;
    println!("{}", output);

    Ok(())
}
