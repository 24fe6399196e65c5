//! CLI implementation for `staffdir rename`

use anyhow::{Context, Result};

use crate::cli::output::{is_quiet, status};
use crate::core::directory::DirectoryCache;

/// Execute the rename command
pub async fn execute(cache: &DirectoryCache, old: &str, new: &str) -> Result<()> {
    let renamed = cache
        .rename(old, new)
        .await
        .with_context(|| format!("Failed to rename '{old}'"))?;

    if is_quiet() {
        return Ok(());
    }

    match renamed {
        Some(employee) => println!("{} Renamed {} to {}", status::SUCCESS, old, employee.name),
        None => println!("{} No employee named '{}'", status::INFO, old),
    }

    Ok(())
}
