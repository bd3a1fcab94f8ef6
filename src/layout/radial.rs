//! Radial placement of a parsed mind map.
//!
//! The root sits at the origin and branches go on a circle around it. Screen
//! convention: `+x` right, `+y` down, angles in degrees measured from `+x`
//! towards `+y`. Subtopics are not placed as nodes; they hang off their branch
//! as a panel on whichever side faces away from the centre.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::mindmap::model::{ColorToken, MindMapNode};

/// Anything closer to the vertical axis than this counts as the right half.
const SIDE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    /// Tight ring: radius `min(180, 120 + 5N)`, offset 15° once there are
    /// more than two branches.
    #[default]
    Compact,
    /// Roomier ring: radius `max(250, 100 + 25N)`, no offset.
    Wide,
}

impl LayoutStyle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Wide => "wide",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Compact => Self::Wide,
            Self::Wide => Self::Compact,
        }
    }
}

impl fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LayoutStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "compact" => Ok(Self::Compact),
            "wide" => Ok(Self::Wide),
            other => bail!("unknown layout style {other:?} (expected compact | wide)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` along `degrees`, relative to the origin.
    pub fn polar(radius: f64, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: radius * radians.cos(),
            y: radius * radians.sin(),
        }
    }

    fn offset(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSide {
    Left,
    Right,
}

impl PanelSide {
    fn for_position(position: Point) -> Self {
        if position.x < -SIDE_EPSILON {
            Self::Left
        } else {
            Self::Right
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    pub id: String,
    pub text: String,
    pub color: ColorToken,
    pub depth: usize,
    pub position: Point,
    /// Direction from the parent, in degrees. `None` for the root.
    pub angle: Option<f64>,
    pub subtopics: Vec<String>,
    /// Where the subtopic panel hangs. `None` when there are no subtopics.
    pub panel: Option<PanelSide>,
}

/// Quadratic curve joining a parent to one of its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub color: ColorToken,
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl Connector {
    /// Bend grows with distance but never past 0.3 of the span.
    fn between(parent: &PlacedNode, child: &PlacedNode) -> Self {
        let start = parent.position;
        let end = child.position;
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let curve = (30.0 / distance).min(0.3);
        Self {
            from: parent.id.clone(),
            to: child.id.clone(),
            color: child.color,
            start,
            control: Point::new(
                start.x + dx / 2.0 - dy * curve,
                start.y + dy / 2.0 + dx * curve,
            ),
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// `segments + 1` points along the curve, endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A mind map with coordinates. Built fresh from every parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub style: LayoutStyle,
    /// Pre-order: root first, then each branch followed by its sub-branches.
    pub nodes: Vec<PlacedNode>,
    pub connectors: Vec<Connector>,
}

impl Layout {
    pub fn compute(root: &MindMapNode, style: LayoutStyle) -> Self {
        let mut layout = Self {
            style,
            nodes: Vec::new(),
            connectors: Vec::new(),
        };

        let root_idx = layout.place(root, 0, Point::ORIGIN, None);
        let count = root.children.len();
        for (i, branch) in root.children.iter().enumerate() {
            let angle = branch_angle(style, i, count);
            let position = Point::polar(branch_radius(style, count), angle);
            let idx = layout.place(branch, 1, position, Some(angle));
            layout.link(root_idx, idx);
            layout.place_sub_branches(branch, idx);
        }
        layout
    }

    pub fn root(&self) -> &PlacedNode {
        &self.nodes[0]
    }

    pub fn branches(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(|n| n.depth == 1)
    }

    /// Extent of all node centres. Never degenerate: a lone point is padded.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        };
        for node in &self.nodes {
            bounds.min_x = bounds.min_x.min(node.position.x);
            bounds.max_x = bounds.max_x.max(node.position.x);
            bounds.min_y = bounds.min_y.min(node.position.y);
            bounds.max_y = bounds.max_y.max(node.position.y);
        }
        if bounds.width() == 0.0 {
            bounds.min_x -= 5.0;
            bounds.max_x += 5.0;
        }
        if bounds.height() == 0.0 {
            bounds.min_y -= 5.0;
            bounds.max_y += 5.0;
        }
        bounds
    }

    fn place(
        &mut self,
        node: &MindMapNode,
        depth: usize,
        position: Point,
        angle: Option<f64>,
    ) -> usize {
        let panel = (depth > 0 && !node.subtopics.is_empty())
            .then(|| PanelSide::for_position(position));
        self.nodes.push(PlacedNode {
            id: node.id.clone(),
            text: node.text.clone(),
            color: node.color,
            depth,
            position,
            angle,
            subtopics: node.subtopics.clone(),
            panel,
        });
        self.nodes.len() - 1
    }

    fn link(&mut self, parent_idx: usize, child_idx: usize) {
        let connector = Connector::between(&self.nodes[parent_idx], &self.nodes[child_idx]);
        self.connectors.push(connector);
    }

    fn place_sub_branches(&mut self, parent: &MindMapNode, parent_idx: usize) {
        let parent_pos = self.nodes[parent_idx].position;
        let depth = self.nodes[parent_idx].depth + 1;
        let count = parent.children.len();
        for (i, child) in parent.children.iter().enumerate() {
            let (offset, angle) = sub_branch_offset(parent_pos, i, count);
            let idx = self.place(child, depth, parent_pos.offset(offset), Some(angle));
            self.link(parent_idx, idx);
            self.place_sub_branches(child, idx);
        }
    }
}

/// Angle of branch `index` out of `count`, in degrees within `[0, 360)`.
pub fn branch_angle(style: LayoutStyle, index: usize, count: usize) -> f64 {
    let step = 360.0 / count as f64;
    let start = match style {
        LayoutStyle::Compact if count > 2 => 15.0,
        _ => 0.0,
    };
    (index as f64 * step + start) % 360.0
}

pub fn branch_radius(style: LayoutStyle, count: usize) -> f64 {
    let count = count as f64;
    match style {
        LayoutStyle::Compact => (120.0 + 5.0 * count).min(180.0),
        LayoutStyle::Wide => (100.0 + 25.0 * count).max(250.0),
    }
}

/// Offset of sub-branch `index` of `count` from its parent, plus its angle.
///
/// A single child drops straight below. Several fan out over an arc centred
/// on the direction pointing away from the map centre.
fn sub_branch_offset(parent: Point, index: usize, count: usize) -> (Point, f64) {
    if count == 1 {
        return (Point::new(0.0, 100.0), 90.0);
    }
    let n = count as f64;
    let outward = parent.y.atan2(parent.x).to_degrees();
    let range = (60.0 + 20.0 * n).min(180.0);
    let step = range / (n - 1.0);
    let angle = outward - range / 2.0 + index as f64 * step;
    (Point::polar(90.0 + 5.0 * n, angle), angle)
}

#[cfg(test)]
impl Layout {
    fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
