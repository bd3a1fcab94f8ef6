//! Interpreter for the loose outline format that lecture mind maps arrive in.
//!
//! ```text
//! # Central Topic
//! - Branch One
//!    * Subtopic 1.1
//! - Branch Two
//!    * Subtopic 2.1
//! ```
//!
//! Interpretation is all-or-nothing: either a root with at least one branch
//! comes out, or `ParseResult::NotParsed`. Lines that do not contribute to
//! the tree are collected as `SkippedLine`s so callers can show why.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::mindmap::model::{MindMapNode, ParseResult};

pub const DEFAULT_MAX_LABEL_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// Line grammar
// ---------------------------------------------------------------------------

/// One trimmed, non-empty line, tagged by its leading marker.
///
/// Precedence, first match wins:
/// 1. `#` prefix: central topic (leading `#` run stripped)
/// 2. `-` prefix: branch (one `-` stripped)
/// 3. `*` prefix, or a `•` anywhere: subtopic (one leading `*`/`•` stripped)
/// 4. anything else: ignorable
///
/// Tagging looks at the line alone. Whether a tag is accepted depends on
/// where the tree builder is (see [`interpret`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTag<'a> {
    CentralTopic(&'a str),
    Branch(&'a str),
    Subtopic(&'a str),
    Ignorable,
}

pub fn classify(line: &str) -> LineTag<'_> {
    let line = line.trim();
    if line.starts_with('#') {
        // The whole `#` run goes, not just the first one: `## Deep` is
        // `Deep`, never `# Deep`.
        LineTag::CentralTopic(line.trim_start_matches('#').trim())
    } else if let Some(rest) = line.strip_prefix('-') {
        LineTag::Branch(rest.trim())
    } else if line.starts_with('*') || line.contains('•') {
        let text = line
            .strip_prefix('*')
            .or_else(|| line.strip_prefix('•'))
            .unwrap_or(line);
        LineTag::Subtopic(text.trim())
    } else {
        LineTag::Ignorable
    }
}

/// Title used when no line carries a `#`: the first non-empty line with a
/// single leading marker removed.
fn fallback_title(line: &str) -> &str {
    let line = line.trim();
    let stripped = ['-', '*', '•', '#']
        .iter()
        .find_map(|m| line.strip_prefix(*m))
        .unwrap_or(line);
    stripped.trim()
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Appeared before the central topic line.
    BeforeTitle,
    /// A second `#` line after the central topic.
    ExtraTitle,
    /// Label longer than the configured limit once its marker is stripped.
    TooLong { chars: usize },
    /// A subtopic marker with nothing after it.
    EmptySubtopic,
    /// A subtopic seen before any branch.
    NoOpenBranch,
    Unrecognized,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeTitle => write!(f, "before central topic"),
            Self::ExtraTitle => write!(f, "extra central topic"),
            Self::TooLong { chars } => write!(f, "too long ({chars} chars)"),
            Self::EmptySubtopic => write!(f, "empty subtopic"),
            Self::NoOpenBranch => write!(f, "subtopic without branch"),
            Self::Unrecognized => write!(f, "no marker"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the original input.
    pub line_number: usize,
    pub text: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub result: ParseResult,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Branch and subtopic labels longer than this are treated as noise.
    pub max_label_chars: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_label_chars: DEFAULT_MAX_LABEL_CHARS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tree building
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum BuildState {
    SeekingTitle,
    InBody(MindMapNode),
}

struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    state: BuildState,
    skipped: Vec<SkippedLine>,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            state: BuildState::SeekingTitle,
            skipped: Vec::new(),
        }
    }

    fn open(&mut self, title: &str) {
        self.state = BuildState::InBody(MindMapNode::root(title));
    }

    fn skip(&mut self, line_number: usize, text: &str, reason: SkipReason) {
        debug!(line = line_number, %reason, "mind map line skipped");
        self.skipped.push(SkippedLine {
            line_number,
            text: text.to_string(),
            reason,
        });
    }

    fn feed(&mut self, line_number: usize, line: &str) {
        let tag = classify(line);
        if let BuildState::SeekingTitle = self.state {
            if let LineTag::CentralTopic(title) = tag {
                self.open(title);
            } else {
                self.skip(line_number, line, SkipReason::BeforeTitle);
            }
            return;
        }

        let max_chars = self.options.max_label_chars;
        let BuildState::InBody(root) = &mut self.state else {
            return;
        };
        let outcome = match tag {
            LineTag::CentralTopic(_) => Err(SkipReason::ExtraTitle),
            LineTag::Branch(text) => match label_too_long(text, max_chars) {
                Some(reason) => Err(reason),
                None => {
                    root.push_child(text);
                    Ok(())
                }
            },
            LineTag::Subtopic(text) => match root.children.last_mut() {
                None => Err(SkipReason::NoOpenBranch),
                Some(_) if text.is_empty() => Err(SkipReason::EmptySubtopic),
                Some(branch) => match label_too_long(text, max_chars) {
                    Some(reason) => Err(reason),
                    None => {
                        branch.subtopics.push(text.to_string());
                        Ok(())
                    }
                },
            },
            LineTag::Ignorable => Err(SkipReason::Unrecognized),
        };

        if let Err(reason) = outcome {
            self.skip(line_number, line, reason);
        }
    }

    fn finish(self) -> Interpretation {
        let result = match self.state {
            BuildState::InBody(root) if !root.children.is_empty() => ParseResult::Parsed(root),
            _ => ParseResult::NotParsed,
        };
        Interpretation {
            result,
            skipped: self.skipped,
        }
    }
}

fn label_too_long(label: &str, max_chars: usize) -> Option<SkipReason> {
    let chars = label.chars().count();
    (chars > max_chars).then_some(SkipReason::TooLong { chars })
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Interpret `input` with the default options, discarding the skip report.
pub fn parse(input: &str) -> ParseResult {
    interpret(input, &ParseOptions::default()).result
}

/// Interpret `input` and report every non-empty line that did not make it
/// into the tree.
///
/// If no line starts with `#`, the first non-empty line becomes the central
/// topic and body scanning starts on the line after it.
pub fn interpret(input: &str, options: &ParseOptions) -> Interpretation {
    let lines: Vec<(usize, &str)> = input
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let mut builder = TreeBuilder::new(options);
    let Some(&(_, first)) = lines.first() else {
        return builder.finish();
    };

    let has_central_topic = lines
        .iter()
        .any(|(_, line)| matches!(classify(line), LineTag::CentralTopic(_)));
    let body = if has_central_topic {
        &lines[..]
    } else {
        builder.open(fallback_title(first));
        &lines[1..]
    };

    for &(line_number, line) in body {
        builder.feed(line_number, line);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parsed(input: &str) -> MindMapNode {
        match parse(input) {
            ParseResult::Parsed(root) => root,
            ParseResult::NotParsed => panic!("expected a parsed mind map for {input:?}"),
        }
    }

    fn texts(nodes: &[MindMapNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.text.as_str()).collect()
    }

    #[rstest]
    #[case("# Title", LineTag::CentralTopic("Title"))]
    #[case("## Deep  ", LineTag::CentralTopic("Deep"))]
    #[case("- Branch", LineTag::Branch("Branch"))]
    #[case("-Tight", LineTag::Branch("Tight"))]
    #[case("* Sub", LineTag::Subtopic("Sub"))]
    #[case("• Bullet", LineTag::Subtopic("Bullet"))]
    #[case("see • here", LineTag::Subtopic("see • here"))]
    #[case("- has • bullet", LineTag::Branch("has • bullet"))]
    #[case("plain prose", LineTag::Ignorable)]
    #[case("1. numbered", LineTag::Ignorable)]
    fn classify_by_leading_marker(#[case] line: &str, #[case] expected: LineTag<'_>) {
        assert_eq!(classify(line), expected);
    }

    #[test]
    fn markdown_heading_levels_do_not_leak_into_title() {
        let root = parsed("## Deep\n- A");
        assert_eq!(root.text, "Deep");
        assert_ne!(root.text, "# Deep");
        assert_eq!(parsed("###Tight\n- A").text, "Tight");
    }

    #[test]
    fn canonical_example_parses() {
        let root = parsed("# T\n- A\n* x\n* y\n- B\n* z");
        assert_eq!(root.text, "T");
        assert_eq!(texts(&root.children), vec!["A", "B"]);
        assert_eq!(root.children[0].subtopics, vec!["x", "y"]);
        assert_eq!(root.children[1].subtopics, vec!["z"]);
        assert!(root.subtopics.is_empty());
    }

    #[test]
    fn indented_llm_output_parses() {
        let input = "\
# Fotosíntesis
- Fase luminosa
   * Clorofila
   * Fotólisis del agua
- Ciclo de Calvin
   * Fijación de CO2
";
        let root = parsed(input);
        assert_eq!(root.text, "Fotosíntesis");
        assert_eq!(texts(&root.children), vec!["Fase luminosa", "Ciclo de Calvin"]);
        assert_eq!(root.children[0].subtopics, vec!["Clorofila", "Fotólisis del agua"]);
    }

    #[rstest]
    #[case("")]
    #[case("   \n\n\t\n")]
    #[case("# Only a title")]
    #[case("# Title\n* orphan subtopic\nprose")]
    #[case("intro text\n# Title\n# Another")]
    fn inputs_without_branches_are_not_parsed(#[case] input: &str) {
        assert_eq!(parse(input), ParseResult::NotParsed);
    }

    #[test]
    fn lines_before_central_topic_are_skipped() {
        let result = interpret(
            "Here is your map:\n- early\n# Topic\n- A",
            &ParseOptions::default(),
        );
        let root = result.result.root().expect("parsed");
        assert_eq!(root.text, "Topic");
        assert_eq!(texts(&root.children), vec!["A"]);
        let reasons: Vec<_> = result.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(reasons, vec![SkipReason::BeforeTitle, SkipReason::BeforeTitle]);
        assert_eq!(result.skipped[1].line_number, 2);
    }

    #[test]
    fn missing_central_topic_falls_back_to_first_line() {
        let root = parsed("- Photosynthesis\n- Light phase\n* Chlorophyll\n- Dark phase");
        assert_eq!(root.text, "Photosynthesis");
        assert_eq!(texts(&root.children), vec!["Light phase", "Dark phase"]);
        assert_eq!(root.children[0].subtopics, vec!["Chlorophyll"]);
    }

    #[test]
    fn fallback_title_strips_one_marker() {
        assert_eq!(fallback_title("• Cells"), "Cells");
        assert_eq!(fallback_title("  Plain title "), "Plain title");
        assert_eq!(fallback_title("--double"), "-double");
    }

    #[test]
    fn long_lines_are_excluded_regardless_of_marker() {
        let long = "x".repeat(51);
        let exact = "y".repeat(50);
        let input = format!("# T\n- {long}\n- {exact}\n* {long}\n• {long}\n* ok");
        let result = interpret(&input, &ParseOptions::default());
        let root = result.result.root().expect("parsed");
        assert_eq!(texts(&root.children), vec![exact.as_str()]);
        assert_eq!(root.children[0].subtopics, vec!["ok"]);
        assert_eq!(
            result
                .skipped
                .iter()
                .filter(|s| s.reason == SkipReason::TooLong { chars: 51 })
                .count(),
            3
        );
    }

    #[test]
    fn label_limit_counts_characters_not_bytes() {
        let accented = "é".repeat(50);
        let root = parsed(&format!("# T\n- {accented}"));
        assert_eq!(root.children[0].text, accented);
    }

    #[test]
    fn label_limit_is_configurable() {
        let options = ParseOptions { max_label_chars: 5 };
        let result = interpret("# T\n- short\n- longer one", &options);
        let root = result.result.root().expect("parsed");
        assert_eq!(texts(&root.children), vec!["short"]);
    }

    #[test]
    fn subtopics_after_rejected_branch_attach_to_previous_branch() {
        let long = "z".repeat(60);
        let root = parsed(&format!("# T\n- A\n- {long}\n* belongs to A"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].subtopics, vec!["belongs to A"]);
    }

    #[test]
    fn skip_report_names_every_dropped_line() {
        let input = "# T\n* early sub\n- A\n*\nprose line\n# Again\n- B";
        let result = interpret(input, &ParseOptions::default());
        let report: Vec<(usize, SkipReason)> = result
            .skipped
            .iter()
            .map(|s| (s.line_number, s.reason))
            .collect();
        assert_eq!(
            report,
            vec![
                (2, SkipReason::NoOpenBranch),
                (4, SkipReason::EmptySubtopic),
                (5, SkipReason::Unrecognized),
                (6, SkipReason::ExtraTitle),
            ]
        );
        assert!(result.result.is_parsed());
    }

    #[test]
    fn crlf_input_parses() {
        let root = parsed("# T\r\n- A\r\n  * x\r\n");
        assert_eq!(root.children[0].subtopics, vec!["x"]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let input = "# T\n- A\n* x\n- B\n• y\nnoise";
        assert_eq!(parse(input), parse(input));
    }

    #[test]
    fn branch_ids_and_colours_follow_position() {
        let root = parsed("# T\n- a\n- b\n- c");
        let ids: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["branch-0", "branch-1", "branch-2"]);
        assert_eq!(root.children[2].color.index(), 2);
    }
}
