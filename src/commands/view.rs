use anyhow::Result;

use crate::tui::canvas;

pub fn run(source: Option<String>, demo: bool) -> Result<()> {
    canvas::run(source, demo)
}

pub fn run_setup() -> Result<()> {
    canvas::run_setup()
}
