//! CLI implementation for `staffdir sync`

use anyhow::{Context, Result};

use crate::cli::output::{is_quiet, status};
use crate::core::directory::DirectoryCache;

/// Execute the sync command
pub async fn execute(cache: &DirectoryCache) -> Result<()> {
    let count = cache
        .refresh()
        .await
        .context("Failed to sync with the registry")?;

    if !is_quiet() {
        println!("{} Synced {} employee(s)", status::SUCCESS, count);
    }

    Ok(())
}
