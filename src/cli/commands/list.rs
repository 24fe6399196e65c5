//! CLI implementation for `staffdir list`

use anyhow::Result;

use crate::cli::output::{employee_row, is_quiet, status};
use crate::core::directory::DirectoryCache;

/// Execute the list command
pub async fn execute(cache: &DirectoryCache) -> Result<()> {
    let employees = cache.list().await;

    if employees.is_empty() {
        if !is_quiet() {
            println!("{} No employees found", status::INFO);
        }
        return Ok(());
    }

    for employee in &employees {
        println!("{}", employee_row(employee));
    }

    let local_only = employees.iter().filter(|e| !e.is_synced()).count();
    if local_only > 0 && !is_quiet() {
        println!();
        println!(
            "{} {} employee(s) not yet saved to the registry",
            status::WARNING,
            local_only
        );
    }

    Ok(())
}
