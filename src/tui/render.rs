use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::layout::radial::{Layout as MapLayout, PanelSide, PlacedNode, Point};
use crate::mindmap::model::ColorToken;
use crate::parser::mindmap::SkippedLine;
use crate::tui::settings::centered_rect;
use crate::tui::viewport::{DEFAULT_ZOOM, ViewState};

const BRANCH_COLORS: [Color; 8] = [
    Color::LightRed,
    Color::Blue,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightMagenta,
];

const ROOT_COLOR: Color = Color::Red;

/// Line segments per curved connector.
const CONNECTOR_SEGMENTS: usize = 16;

/// Room around the outermost node centres for labels and subtopic panels,
/// in layout units.
const LABEL_MARGIN_X: f64 = 140.0;
const LABEL_MARGIN_Y: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidePanel {
    Skipped,
    RawText,
    Hidden,
}

impl SidePanel {
    pub fn next(self) -> Self {
        match self {
            Self::Skipped => Self::RawText,
            Self::RawText => Self::Hidden,
            Self::Hidden => Self::Skipped,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Skipped => "skipped lines",
            Self::RawText => "raw text",
            Self::Hidden => "off",
        }
    }
}

#[derive(Debug)]
pub struct MapRenderData<'a> {
    pub source_name: &'a str,
    /// `None` when the text could not be interpreted.
    pub layout: Option<&'a MapLayout>,
    pub raw_text: &'a str,
    pub skipped: &'a [SkippedLine],
    pub view: &'a ViewState,
    pub show_subtopics: bool,
    pub curved_connectors: bool,
    pub side_panel: SidePanel,
    pub message: Option<&'a str>,
    pub show_help: bool,
}

/// Where the map landed on screen and how many layout units one cell spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapGeometry {
    pub area: Rect,
    pub units_per_col: f64,
    pub units_per_row: f64,
}

pub fn branch_color(token: ColorToken) -> Color {
    BRANCH_COLORS[token.index() % BRANCH_COLORS.len()]
}

pub fn draw(frame: &mut Frame, data: &MapRenderData<'_>) -> Option<MapGeometry> {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let title = Line::from(vec![
        Span::styled("hoid view", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ]);
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(header_lines(data)), header_area);

    let (map_area, side_area) = if data.side_panel == SidePanel::Hidden {
        (body_area, None)
    } else {
        let [map, side] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(body_area);
        (map, Some(side))
    };

    let geometry = match data.layout {
        Some(layout) => Some(draw_map(frame, map_area, layout, data)),
        None => {
            draw_not_parsed(frame, map_area, data.raw_text);
            None
        }
    };
    if let Some(side) = side_area {
        draw_side_panel(frame, side, data);
    }

    let footer = data.message.map(str::to_string).unwrap_or_else(|| {
        "q quit - +/- zoom - 0 reset - arrows/drag pan - r reload - t side panel - s setup"
            .to_string()
    });
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::DarkGray),
        ))),
        footer_area,
    );

    if data.show_help {
        render_help_overlay(frame);
    }
    geometry
}

fn header_lines(data: &MapRenderData<'_>) -> Vec<Line<'static>> {
    let summary = match data.layout {
        Some(layout) => {
            let branches = layout.branches().count();
            let subtopics: usize = layout.nodes.iter().map(|n| n.subtopics.len()).sum();
            format!("{branches} branches, {subtopics} subtopics, {} layout", layout.style)
        }
        None => "not visualized".to_string(),
    };
    let view = data.view;
    let pan_hint = if view.is_dragging() {
        "moving...".to_string()
    } else if view.can_pan() {
        let pan = view.pan();
        format!("drag or arrows to pan, offset ({:.0}, {:.0})", pan.x, pan.y)
    } else if view.zoom() < DEFAULT_ZOOM {
        "zoomed out, 0 resets".to_string()
    } else {
        "zoom in to pan".to_string()
    };
    vec![
        Line::from(vec![
            Span::styled(
                data.source_name.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(summary, Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::styled(
                format!("zoom {}%", data.view.percent()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(pan_hint, Style::default().fg(Color::DarkGray)),
        ]),
    ]
}

/// Half extents of the window that shows the whole map at zoom 1.
fn half_extents(layout: &MapLayout) -> (f64, f64) {
    let b = layout.bounds();
    let hw = b.min_x.abs().max(b.max_x.abs()) + LABEL_MARGIN_X;
    let hh = b.min_y.abs().max(b.max_y.abs()) + LABEL_MARGIN_Y;
    (hw, hh)
}

fn draw_map(
    frame: &mut Frame,
    area: Rect,
    layout: &MapLayout,
    data: &MapRenderData<'_>,
) -> MapGeometry {
    let block = Block::default()
        .title(format!(" {} ", layout.root().text))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let canvas_area = block.inner(area);

    let (hw, hh) = half_extents(layout);
    let (xs, ys) = data.view.window(hw, hh);
    let geometry = MapGeometry {
        area: canvas_area,
        units_per_col: (xs[1] - xs[0]) / canvas_area.width.max(1) as f64,
        units_per_row: (ys[1] - ys[0]) / canvas_area.height.max(1) as f64,
    };

    // Layout `+y` points down, canvas `+y` points up.
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(xs)
        .y_bounds([-ys[1], -ys[0]])
        .paint(|ctx| {
            for connector in &layout.connectors {
                let color = branch_color(connector.color);
                if data.curved_connectors {
                    let points = connector.sample(CONNECTOR_SEGMENTS);
                    for pair in points.windows(2) {
                        draw_segment(ctx, pair[0], pair[1], color);
                    }
                } else {
                    draw_segment(ctx, connector.start, connector.end, color);
                }
            }
            ctx.layer();

            for node in &layout.nodes {
                print_node(ctx, node, &geometry);
            }
            if data.show_subtopics {
                for node in &layout.nodes {
                    print_subtopics(ctx, node, &geometry);
                }
            }
        });
    frame.render_widget(canvas, area);
    geometry
}

fn draw_segment(ctx: &mut Context<'_>, from: Point, to: Point, color: Color) {
    ctx.draw(&CanvasLine::new(from.x, -from.y, to.x, -to.y, color));
}

fn node_label(node: &PlacedNode) -> String {
    if node.depth == 0 {
        format!("( {} )", node.text)
    } else {
        format!("[{}]", node.text)
    }
}

fn print_node(ctx: &mut Context<'_>, node: &PlacedNode, geometry: &MapGeometry) {
    let label = node_label(node);
    let half = label.chars().count() as f64 / 2.0;
    let style = if node.depth == 0 {
        Style::default()
            .fg(Color::White)
            .bg(ROOT_COLOR)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(branch_color(node.color))
            .add_modifier(Modifier::BOLD)
    };
    ctx.print(
        node.position.x - half * geometry.units_per_col,
        -node.position.y,
        Span::styled(label, style),
    );
}

fn print_subtopics(ctx: &mut Context<'_>, node: &PlacedNode, geometry: &MapGeometry) {
    let Some(side) = node.panel else {
        return;
    };
    let label_half = node_label(node).chars().count() as f64 / 2.0;
    let style = Style::default().fg(branch_color(node.color));
    for (i, subtopic) in node.subtopics.iter().enumerate() {
        let text = format!("• {subtopic}");
        let width = text.chars().count() as f64;
        let cols = match side {
            PanelSide::Right => label_half + 2.0,
            PanelSide::Left => -(label_half + 2.0 + width),
        };
        ctx.print(
            node.position.x + cols * geometry.units_per_col,
            -node.position.y - (i as f64 + 1.0) * geometry.units_per_row,
            Span::styled(text, style),
        );
    }
}

fn draw_not_parsed(frame: &mut Frame, area: Rect, raw_text: &str) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Could not visualize this mind map",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "The text does not follow the `# topic` / `- branch` / `* subtopic` format.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Received text:",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if raw_text.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.extend(raw_text.lines().map(|l| {
        Line::from(Span::styled(
            l.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    }));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::LightRed))
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_side_panel(frame: &mut Frame, area: Rect, data: &MapRenderData<'_>) {
    let width = area.width.saturating_sub(4) as usize;
    let (title, lines) = match data.side_panel {
        SidePanel::Skipped => (
            format!("Skipped lines ({})", data.skipped.len()),
            skipped_lines(data.skipped, width),
        ),
        SidePanel::RawText => (
            "Raw text".to_string(),
            data.raw_text
                .lines()
                .map(|l| Line::from(l.to_string()))
                .collect(),
        ),
        SidePanel::Hidden => return,
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn skipped_lines(skipped: &[SkippedLine], width: usize) -> Vec<Line<'static>> {
    if skipped.is_empty() {
        return vec![Line::from(Span::styled(
            "No skipped lines.",
            Style::default().fg(Color::Green),
        ))];
    }
    skipped
        .iter()
        .flat_map(|s| {
            [
                Line::from(vec![
                    Span::styled(
                        format!("L{:<4}", s.line_number),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(s.reason.to_string(), Style::default().fg(Color::Yellow)),
                ]),
                Line::from(Span::styled(
                    format!("  {}", truncate_text(&s.text, width.saturating_sub(2))),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        })
        .collect()
}

fn truncate_text(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return text.chars().take(max_width).collect();
    }
    let mut out = text
        .chars()
        .take(max_width.saturating_sub(3))
        .collect::<String>();
    out.push_str("...");
    out
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 60);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("ZOOM"),
        Line::from("  + / = zoom in, - zoom out (50% to 250%), 0 resets"),
        Line::from(""),
        Line::from("PAN (only while zoomed in)"),
        Line::from("  drag with the mouse, or arrows / hjkl"),
        Line::from("  zooming back to 100% recentres the map"),
        Line::from(""),
        Line::from("PANELS"),
        Line::from("  t cycles skipped lines / raw text / off"),
        Line::from("  s opens setup, r reloads the file from disk"),
        Line::from(""),
        Line::from("Esc closes this help."),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}
