//! `hoid init`: create a `.hoid/` project with a default config.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use tracing::info;

use crate::parser::config::{self, Config};
use crate::project;

/// Entry point called from `main`.
pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    let config_path = project::config_path(root);
    if config_path.exists() {
        bail!(
            "hoid is already initialised ({} exists). Use `hoid setup` to change settings.",
            config_path.display()
        );
    }

    let hoid_dir = project::hoid_dir(root);
    fs::create_dir_all(&hoid_dir)
        .with_context(|| format!("unable to create {}", hoid_dir.display()))?;
    fs::write(&config_path, config::serialize(&Config::default()))
        .with_context(|| format!("unable to write {}", config_path.display()))?;
    info!(path = %config_path.display(), "created config");

    println!("  {} .hoid/config.hoid", "Created".green().bold());
    println!(
        "  {} {}",
        "Next".cyan().bold(),
        "hoid view <FILE> to open a mind map".dark_grey()
    );
    Ok(())
}
