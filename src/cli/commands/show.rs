//! CLI implementation for `staffdir show`

use anyhow::Result;

use crate::core::directory::DirectoryCache;

/// Execute the show command
pub async fn execute(cache: &DirectoryCache, name: &str) -> Result<()> {
    let Some(employee) = cache.get(name).await else {
        anyhow::bail!("No employee named '{name}'");
    };

    println!("Name:  {}", employee.name);
    println!("Color: {}", employee.color);
    println!("Role:  {}", employee.role_or_default());
    if employee.is_synced() {
        println!("Id:    {}", employee.id);
    } else {
        println!("Id:    (local only)");
    }

    Ok(())
}
