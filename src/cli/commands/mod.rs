//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod color;
pub mod list;
pub mod merge;
pub mod remove;
pub mod rename;
pub mod show;
pub mod sync;

use anyhow::Result;
use clap::Subcommand;

use crate::core::directory::DirectoryCache;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every employee
    List,

    /// Show one employee
    Show {
        /// Employee name
        name: String,
    },

    /// Set an employee's color, creating the employee if needed
    Color {
        /// Employee name
        name: String,

        /// Color as #RRGGBB
        color: String,
    },

    /// Rename an employee
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },

    /// Merge employees into a target, moving their resources to it
    Merge {
        /// Employee that survives the merge
        target: String,

        /// Employees folded into the target
        #[arg(required = true)]
        sources: Vec<String>,
    },

    /// Remove an employee
    Remove {
        /// Employee name
        name: String,
    },

    /// Reload the directory from the registry
    Sync,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, cache: &DirectoryCache) -> Result<()> {
        match self {
            Self::List => list::execute(cache).await,
            Self::Show { name } => show::execute(cache, &name).await,
            Self::Color { name, color } => color::execute(cache, &name, &color).await,
            Self::Rename { old, new } => rename::execute(cache, &old, &new).await,
            Self::Merge { target, sources } => merge::execute(cache, &target, &sources).await,
            Self::Remove { name } => remove::execute(cache, &name).await,
            Self::Sync => sync::execute(cache).await,
        }
    }
}
