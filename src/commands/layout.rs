//! `hoid layout`: print node coordinates from the radial layout.

use anyhow::{Context, Result};

use crate::commands::show::{self, not_parsed_lines};
use crate::layout::radial::{Layout, LayoutStyle, PanelSide, PlacedNode};

pub fn run(source: &str, json: bool, wide: bool) -> Result<()> {
    let loaded = show::load(source)?;
    let style = if wide {
        LayoutStyle::Wide
    } else {
        loaded.config.layout
    };

    let layout = match loaded.interpretation.result.root() {
        Some(root) => Layout::compute(root, style),
        None => {
            if json {
                let out = serde_json::to_string_pretty(&loaded.interpretation.result)
                    .context("unable to serialise parse result")?;
                println!("{out}");
            } else {
                for line in not_parsed_lines(&loaded.text) {
                    println!("{line}");
                }
            }
            return Ok(());
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&layout).context("unable to serialise layout")?;
        println!("{out}");
    } else {
        for line in layout_lines(&layout) {
            println!("{line}");
        }
    }
    Ok(())
}

fn layout_lines(layout: &Layout) -> Vec<String> {
    layout.nodes.iter().map(node_line).collect()
}

fn node_line(node: &PlacedNode) -> String {
    let indent = "  ".repeat(node.depth);
    let mut line = format!(
        "{indent}{}  ({}, {})  {}",
        node.id,
        coord(node.position.x),
        coord(node.position.y),
        node.text
    );
    if let Some(side) = node.panel {
        let side = match side {
            PanelSide::Left => "left",
            PanelSide::Right => "right",
        };
        line.push_str(&format!("  [{} subtopics, {side}]", node.subtopics.len()));
    }
    line
}

/// One decimal, without a `-0.0` for values that round to zero.
fn coord(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{:.1}", rounded + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mindmap::model::ParseResult;
    use crate::parser::mindmap;

    fn layout_of(input: &str, style: LayoutStyle) -> Layout {
        match mindmap::parse(input) {
            ParseResult::Parsed(root) => Layout::compute(&root, style),
            ParseResult::NotParsed => panic!("expected parse"),
        }
    }

    #[test]
    fn prints_root_then_branches_with_panels() {
        let layout = layout_of("# T\n- East\n* e\n- West", LayoutStyle::Compact);
        assert_eq!(
            layout_lines(&layout),
            vec![
                "root  (0.0, 0.0)  T",
                "  branch-0  (130.0, 0.0)  East  [1 subtopics, right]",
                "  branch-1  (-130.0, 0.0)  West",
            ]
        );
    }

    #[test]
    fn wide_style_uses_larger_ring() {
        let layout = layout_of("# T\n- A", LayoutStyle::Wide);
        assert_eq!(layout_lines(&layout)[1], "  branch-0  (250.0, 0.0)  A");
    }

    #[test]
    fn coordinates_never_print_negative_zero() {
        assert_eq!(coord(-0.0), "0.0");
        assert_eq!(coord(-0.04), "0.0");
        assert_eq!(coord(-12.36), "-12.4");
    }
}
