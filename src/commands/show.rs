//! `hoid show`: print a mind map as an outline, or as JSON.

use anyhow::{Context, Result};

use crate::mindmap::model::MindMapNode;
use crate::parser::config::Config;
use crate::parser::mindmap::{self, Interpretation};
use crate::project;

/// Raw text plus what the interpreter made of it, under the project config.
pub(crate) struct Loaded {
    pub text: String,
    pub config: Config,
    pub interpretation: Interpretation,
}

pub(crate) fn load(source: &str) -> Result<Loaded> {
    let config = project::load_current_config()?;
    let text = project::read_input(source)?;
    let interpretation = mindmap::interpret(&text, &config.parse_options());
    Ok(Loaded {
        text,
        config,
        interpretation,
    })
}

pub fn run(source: &str, json: bool) -> Result<()> {
    let loaded = load(source)?;
    if json {
        let out = serde_json::to_string_pretty(&loaded.interpretation.result)
            .context("unable to serialise mind map")?;
        println!("{out}");
        return Ok(());
    }
    let lines = match loaded.interpretation.result.root() {
        Some(root) => outline_lines(root),
        None => not_parsed_lines(&loaded.text),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn outline_lines(root: &MindMapNode) -> Vec<String> {
    let mut lines = Vec::new();
    push_node(&mut lines, root, 0);
    lines
}

/// The root prints bare; every other node as `- text` indented by depth.
fn push_node(lines: &mut Vec<String>, node: &MindMapNode, depth: usize) {
    if node.is_root() {
        lines.push(node.text.clone());
    } else {
        let indent = "  ".repeat(depth - 1);
        lines.push(format!("{indent}- {}", node.text));
        for subtopic in &node.subtopics {
            lines.push(format!("{indent}    * {subtopic}"));
        }
    }
    for child in &node.children {
        push_node(lines, child, depth + 1);
    }
}

/// Message shown instead of a map, followed by the text as received.
pub(crate) fn not_parsed_lines(text: &str) -> Vec<String> {
    let mut lines = vec![
        "Could not visualize this mind map.".to_string(),
        "Expected a `# topic` line followed by `- branch` and `* subtopic` lines.".to_string(),
        String::new(),
        "Received text:".to_string(),
    ];
    if text.trim().is_empty() {
        lines.push("(empty)".to_string());
    }
    lines.extend(text.lines().map(|l| format!("  {l}")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mindmap::model::ParseResult;

    fn root_of(input: &str) -> MindMapNode {
        match mindmap::parse(input) {
            ParseResult::Parsed(root) => root,
            ParseResult::NotParsed => panic!("expected parse"),
        }
    }

    #[test]
    fn outline_lists_branches_with_indented_subtopics() {
        let root = root_of("# T\n- A\n* x\n* y\n- B\n* z");
        assert_eq!(
            outline_lines(&root),
            vec!["T", "- A", "    * x", "    * y", "- B", "    * z"]
        );
    }

    #[test]
    fn nested_branches_indent_further() {
        let mut root = MindMapNode::root("T");
        root.push_child("A").push_child("A.1");
        assert_eq!(outline_lines(&root), vec!["T", "- A", "  - A.1"]);
    }

    #[test]
    fn not_parsed_output_echoes_text() {
        let lines = not_parsed_lines("hello\nworld");
        assert_eq!(lines[0], "Could not visualize this mind map.");
        assert_eq!(&lines[lines.len() - 2..], ["  hello", "  world"]);
        assert!(not_parsed_lines("").contains(&"(empty)".to_string()));
    }

    #[test]
    fn json_output_is_tagged_by_status() {
        let parsed = serde_json::to_value(mindmap::parse("# T\n- A")).unwrap();
        assert_eq!(parsed["status"], "parsed");
        assert_eq!(parsed["root"]["children"][0]["text"], "A");

        let failed = serde_json::to_value(mindmap::parse("nothing")).unwrap();
        assert_eq!(failed["status"], "not_parsed");
    }
}
