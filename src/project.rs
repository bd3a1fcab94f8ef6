//! Paths for the `.hoid/` project directory and input loading.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::parser::config::{self, Config};

/// Marker accepted in place of a path to read standard input.
pub const STDIN_MARKER: &str = "-";

/// Walk upward from `start` to find the directory containing `.hoid/`.
pub fn find_root_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if hoid_dir(dir).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Walk upward from the current working directory. Absence is not an error:
/// every command runs on defaults outside a project.
pub fn find_root() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir()?;
    Ok(find_root_from(&cwd))
}

pub fn hoid_dir(root: &Path) -> PathBuf {
    root.join(".hoid")
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(".hoid").join("config.hoid")
}

/// Config for `root`, or defaults when there is no project or no file.
pub fn load_config(root: Option<&Path>) -> Result<Config> {
    let Some(root) = root else {
        return Ok(Config::default());
    };
    let path = config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    let cfg = config::parse(&content).with_context(|| format!("invalid {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(cfg)
}

/// Config for the project enclosing the working directory.
pub fn load_current_config() -> Result<Config> {
    let root = find_root()?;
    load_config(root.as_deref())
}

pub fn save_config(root: &Path, cfg: &Config) -> Result<()> {
    let path = config_path(root);
    fs::write(&path, config::serialize(cfg))
        .with_context(|| format!("unable to write {}", path.display()))
}

/// Read mind-map text from `source`, which is a file path or `-` for stdin.
pub fn read_input(source: &str) -> Result<String> {
    if source == STDIN_MARKER {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("unable to read standard input")?;
        return Ok(text);
    }
    let path = Path::new(source);
    if path.is_dir() {
        bail!("{} is a directory, expected a text file", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))
}

/// Short name for headers and messages.
pub fn display_name(source: &str) -> String {
    if source == STDIN_MARKER {
        return "<stdin>".to_string();
    }
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| source.to_string())
}
