//! CLI implementation for `staffdir merge`

use anyhow::Result;

use crate::cli::output::{is_quiet, status};
use crate::core::directory::DirectoryCache;

/// Execute the merge command
pub async fn execute(cache: &DirectoryCache, target: &str, sources: &[String]) -> Result<()> {
    let report = cache.merge(sources, target).await;

    if is_quiet() {
        return Ok(());
    }

    if report.removed.is_empty() && report.is_clean() {
        println!("{} Nothing to merge into '{}'", status::INFO, target);
        return Ok(());
    }

    println!(
        "{} Merged {} into {}",
        status::SUCCESS,
        report.removed.join(", "),
        report.target
    );

    for failure in &report.failures {
        println!(
            "  {} {} (#{}): {} failed: {}",
            status::WARNING,
            failure.name,
            failure.id,
            failure.step,
            failure.error
        );
    }
    if !report.is_clean() {
        println!("  Run 'staffdir sync' to reload the registry's view");
    }

    Ok(())
}
