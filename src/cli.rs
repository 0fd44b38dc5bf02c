//! Command-line interface parsing for the reqres client
//!
//! This module handles parsing of CLI arguments using clap and turns them,
//! together with the config file, into the settings the client starts with.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{resolve_config, ApiConfig, ConfigError};
use crate::transport::RetryPolicy;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reqres client - fetch users from the reqres directory API with caching
#[derive(Parser, Debug)]
#[command(name = "reqres-client")]
#[command(about = "Cached, retrying client for the reqres user directory")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the per-user config file)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Override the cache lifetime in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub cache_seconds: Option<u64>,

    /// Disable retrying of failed requests
    #[arg(long, global = true)]
    pub no_retry: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once the client is built
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the demo: list all users twice, then fetch user 2 twice
    Demo,
    /// Fetch one user by id and print it as JSON
    User {
        /// Directory id of the user
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Fetch all users and print them as JSON
    Users,
}

/// Settings derived from CLI arguments and config for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// API and cache settings
    pub api: ApiConfig,
    /// Retry policy for the HTTP transport
    pub retry: RetryPolicy,
    /// Action to run
    pub command: Command,
    /// Whether debug logging was requested
    pub verbose: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Loads the config file, applies command-line overrides on top and
    /// validates the result.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base = resolve_config(cli.config.as_deref())?;
        Self::from_cli_with_base(cli, base)
    }

    /// Like [`StartupConfig::from_cli`], with an already loaded base config
    pub fn from_cli_with_base(cli: &Cli, mut api: ApiConfig) -> Result<Self, CliError> {
        if let Some(base_url) = &cli.base_url {
            api.base_url = base_url.clone();
        }
        if let Some(seconds) = cli.cache_seconds {
            api.cache_duration_seconds = seconds;
        }
        let api = api.normalized();
        api.validate()?;

        let retry = if cli.no_retry {
            RetryPolicy::none()
        } else {
            RetryPolicy::default()
        };

        Ok(StartupConfig {
            api,
            retry,
            command: cli.command.clone().unwrap_or(Command::Demo),
            verbose: cli.verbose,
        })
    }

    /// Log filter directive for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "reqres_client=debug"
        } else {
            "reqres_client=info"
        }
    }
}
