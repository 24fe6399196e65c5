//! CLI implementation for `staffdir color`

use anyhow::{Context, Result};

use crate::cli::output::{is_quiet, status};
use crate::core::directory::DirectoryCache;

/// Execute the color command
pub async fn execute(cache: &DirectoryCache, name: &str, color: &str) -> Result<()> {
    let employee = cache
        .set_color(name, color)
        .await
        .with_context(|| format!("Failed to set color of '{name}'"))?;

    if !is_quiet() {
        println!(
            "{} {} is now {}",
            status::SUCCESS,
            employee.name,
            employee.color
        );
    }

    Ok(())
}
