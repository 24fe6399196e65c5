//! CLI implementation for `staffdir remove`

use anyhow::Result;

use crate::cli::output::{is_quiet, status};
use crate::core::directory::DirectoryCache;

/// Execute the remove command
pub async fn execute(cache: &DirectoryCache, name: &str) -> Result<()> {
    let removed = cache.remove(name).await;

    if is_quiet() {
        return Ok(());
    }

    match removed {
        Some(employee) => println!("{} Removed {}", status::SUCCESS, employee.name),
        None => println!("{} No employee named '{}'", status::INFO, name),
    }

    Ok(())
}
