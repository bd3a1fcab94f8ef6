//! `hoid edit`: open a mind-map text file in an editor.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use tracing::debug;

use crate::mindmap::model::ParseResult;
use crate::parser::mindmap;
use crate::project;

pub fn run(file: &str) -> Result<()> {
    let path = Path::new(file);
    if path.is_dir() {
        bail!("{} is a directory, expected a text file", path.display());
    }
    let root = project::find_root()?;
    let config = project::load_config(root.as_deref())?;
    let editor = resolve_editor(config.editor.clone());

    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("no editor configured for `hoid edit`"))?;
    let args: Vec<String> = parts.map(ToString::to_string).collect();
    debug!(%editor, file, "launching editor");

    let status = Command::new(program)
        .args(&args)
        .arg(path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| {
            format!(
                "failed to launch editor {:?} for {}",
                editor,
                path.display()
            )
        })?;

    if !status.success() {
        bail!("editor exited with status {}", status);
    }

    if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        // Outside a project the default interpretation rules apply.
        let result = match root {
            Some(_) => mindmap::interpret(&text, &config.parse_options()).result,
            None => mindmap::parse(&text),
        };
        println!("  {}", outcome_line(&result));
    }
    Ok(())
}

fn outcome_line(result: &ParseResult) -> String {
    match result.root() {
        Some(root) => format!(
            "{} {} ({} branches)",
            "Saved".green().bold(),
            root.text,
            root.children.len()
        ),
        None => format!(
            "{} {}",
            "Not visualizable".red().bold(),
            "run `hoid check` to see skipped lines".dark_grey()
        ),
    }
}

fn resolve_editor(config_editor: Option<String>) -> String {
    let from_env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    config_editor
        .filter(|v| !v.trim().is_empty())
        .or_else(|| from_env("HOID_EDITOR"))
        .or_else(|| from_env("VISUAL"))
        .or_else(|| from_env("EDITOR"))
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "vi".to_string()
            }
        })
}
