//! Parser for `.hoid/config.hoid`.
//!
//! The format is one `key: value` pair per line. Blank lines and lines
//! starting with `#` are ignored. Unknown keys are warned about and skipped so
//! older binaries can read newer config files.

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::layout::radial::LayoutStyle;
use crate::parser::mindmap::{DEFAULT_MAX_LABEL_CHARS, ParseOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub layout: LayoutStyle,
    /// Draw subtopic panels next to their branch.
    pub show_subtopics: bool,
    /// Draw connectors as curves rather than straight lines.
    pub curved_connectors: bool,
    /// Show the skipped-line report in the viewer side panel.
    pub show_skipped: bool,
    pub max_label_chars: usize,
    pub editor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutStyle::Compact,
            show_subtopics: true,
            curved_connectors: true,
            show_skipped: true,
            max_label_chars: DEFAULT_MAX_LABEL_CHARS,
            editor: None,
        }
    }
}

impl Config {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_label_chars: self.max_label_chars,
        }
    }
}

pub fn parse(input: &str) -> Result<Config> {
    let mut config = Config::default();

    for (idx, raw) in input.lines().enumerate() {
        let line_num = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("config line {line_num}: expected `key: value`, got {line:?}");
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "layout" => {
                config.layout = value
                    .parse()
                    .with_context(|| format!("config line {line_num}"))?;
            }
            "show_subtopics" => config.show_subtopics = parse_bool(value, line_num)?,
            "curved_connectors" => config.curved_connectors = parse_bool(value, line_num)?,
            "show_skipped" => config.show_skipped = parse_bool(value, line_num)?,
            "max_label_chars" => {
                let limit: usize = value.parse().with_context(|| {
                    format!("config line {line_num}: max_label_chars must be a positive integer")
                })?;
                if limit == 0 {
                    bail!("config line {line_num}: max_label_chars must be at least 1");
                }
                config.max_label_chars = limit;
            }
            "editor" => {
                config.editor = (!value.is_empty()).then(|| value.to_string());
            }
            other => warn!(key = other, line = line_num, "ignoring unknown config key"),
        }
    }

    Ok(config)
}

pub fn serialize(config: &Config) -> String {
    let editor = config.editor.clone().unwrap_or_default();
    format!(
        "\
# hoid configuration
# Edit manually or run: hoid setup

# Branch ring around the central topic
# Options: compact | wide
layout: {}

# Draw subtopic lists next to their branch in `hoid view`
show_subtopics: {}

# Curved connectors between nodes (off draws straight lines)
curved_connectors: {}

# Show the skipped-line report beside the map in `hoid view`
show_skipped: {}

# Branch and subtopic labels longer than this are treated as noise
max_label_chars: {}

# Preferred editor for `hoid edit` (falls back to $HOID_EDITOR, $VISUAL, then $EDITOR)
editor: {}
",
        config.layout,
        config.show_subtopics,
        config.curved_connectors,
        config.show_skipped,
        config.max_label_chars,
        editor,
    )
}

fn parse_bool(value: &str, line_num: usize) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => bail!("config line {line_num}: expected true or false, got {other:?}"),
    }
}
