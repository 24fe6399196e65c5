//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use commands::Commands;
use output::{create_spinner, status};

use crate::core::directory::DirectoryCache;
use crate::core::global_config::GlobalConfig;
use crate::error::DirectoryError;
use crate::infra::dirs::StaffdirDirs;

/// Staffdir - Offline-capable employee directory
///
/// View and edit the employee registry, with a local snapshot that keeps
/// working when the registry is unreachable.
#[derive(Parser, Debug)]
#[command(name = "staffdir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Registry base URL
    #[arg(long, env = "STAFFDIR_REGISTRY_URL", global = true)]
    pub registry: Option<String>,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            return Ok(());
        };

        let cache = open_directory(self.registry.as_deref())
            .await
            .context("Failed to load configuration")?;

        let spinner = (!self.quiet).then(|| create_spinner("Syncing employee directory..."));
        cache.bootstrap().await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        command.run(&cache).await?;

        if let Some(error) = cache.state().await.error {
            if !self.quiet {
                eprintln!("{} {}", status::WARNING, error);
            }
        }
        Ok(())
    }
}

/// Build the directory cache from the global config
async fn open_directory(
    registry_override: Option<&str>,
) -> Result<DirectoryCache, DirectoryError> {
    let dirs = StaffdirDirs::new();
    let config =
        GlobalConfig::load(&dirs).map_err(|e| DirectoryError::Config(e.to_string()))?;

    let registry = config.build_registry(registry_override);
    tracing::info!("Using registry at {}", registry.base_url());

    let storage = config.open_storage(&dirs).await;
    Ok(DirectoryCache::new(Arc::new(registry), storage))
}
