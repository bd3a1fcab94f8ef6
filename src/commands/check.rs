//! `hoid check`: report every line the interpreter skipped, and why.

use anyhow::Result;
use crossterm::style::Stylize;

use crate::commands::show;
use crate::mindmap::model::ParseResult;
use crate::parser::mindmap::{Interpretation, SkippedLine};

pub fn run(source: &str) -> Result<()> {
    let loaded = show::load(source)?;
    let report = &loaded.interpretation;

    for skipped in &report.skipped {
        println!("  {}", skipped_line(skipped).yellow());
    }
    let summary = summary_line(report);
    if report.result.is_parsed() {
        println!("  {} {}", "OK".green().bold(), summary);
    } else {
        println!("  {} {}", "NOT PARSED".red().bold(), summary);
    }
    Ok(())
}

fn skipped_line(skipped: &SkippedLine) -> String {
    format!(
        "line {}: {}: {}",
        skipped.line_number, skipped.reason, skipped.text
    )
}

fn summary_line(report: &Interpretation) -> String {
    let skipped = match report.skipped.len() {
        0 => "no lines skipped".to_string(),
        1 => "1 line skipped".to_string(),
        n => format!("{n} lines skipped"),
    };
    match &report.result {
        ParseResult::Parsed(root) => format!(
            "{} branches, {} subtopics, {skipped}",
            root.children.len(),
            root.subtopic_count()
        ),
        ParseResult::NotParsed => format!("could not visualize this mind map, {skipped}"),
    }
}
