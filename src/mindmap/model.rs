use serde::Serialize;

/// Number of distinct branch colours. Tokens wrap around after this.
pub const PALETTE_SIZE: usize = 8;

pub const ROOT_ID: &str = "root";

/// Index into the branch palette, derived from a node's position among its
/// siblings (never from its text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorToken(u8);

impl ColorToken {
    pub fn for_sibling(index: usize) -> Self {
        Self((index % PALETTE_SIZE) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the mind map.
///
/// The root sits at depth 0 and never carries subtopics. Branches sit at
/// depth 1 and own an ordered list of subtopic strings. Sub-branches are
/// representable through `children` but the text interpreter never creates
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapNode {
    pub id: String,
    pub text: String,
    pub color: ColorToken,
    pub children: Vec<MindMapNode>,
    pub subtopics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl MindMapNode {
    pub fn root(text: impl Into<String>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            text: text.into(),
            color: ColorToken::for_sibling(0),
            children: Vec::new(),
            subtopics: Vec::new(),
            parent_id: None,
        }
    }

    /// Append a child under `self`, assigning its id and colour from the
    /// position it lands in. Returns a mutable reference to the new child.
    pub fn push_child(&mut self, text: impl Into<String>) -> &mut MindMapNode {
        let index = self.children.len();
        let id = if self.id == ROOT_ID {
            format!("branch-{index}")
        } else {
            format!("{}-{index}", self.id)
        };
        self.children.push(MindMapNode {
            id,
            text: text.into(),
            color: ColorToken::for_sibling(index),
            children: Vec::new(),
            subtopics: Vec::new(),
            parent_id: Some(self.id.clone()),
        });
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Total subtopic strings across the whole tree.
    pub fn subtopic_count(&self) -> usize {
        self.subtopics.len()
            + self
                .children
                .iter()
                .map(MindMapNode::subtopic_count)
                .sum::<usize>()
    }
}

/// Outcome of interpreting one document. There is no partial success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "root", rename_all = "snake_case")]
pub enum ParseResult {
    Parsed(MindMapNode),
    NotParsed,
}

impl ParseResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn root(&self) -> Option<&MindMapNode> {
        match self {
            Self::Parsed(root) => Some(root),
            Self::NotParsed => None,
        }
    }
}
