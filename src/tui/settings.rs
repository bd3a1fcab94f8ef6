use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};

use crate::layout::radial::LayoutStyle;
use crate::parser::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    None,
    Changed,
    Close,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPanelState {
    pub selected_row: usize,
}

/// One toggle in the panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    WideLayout,
    Subtopics,
    CurvedConnectors,
    SkippedReport,
}

impl Toggle {
    const ALL: [Toggle; 4] = [
        Toggle::WideLayout,
        Toggle::Subtopics,
        Toggle::CurvedConnectors,
        Toggle::SkippedReport,
    ];

    fn at(row: usize) -> Self {
        Self::ALL[row.min(Self::ALL.len() - 1)]
    }

    fn label(self) -> &'static str {
        match self {
            Self::WideLayout => "wide layout",
            Self::Subtopics => "subtopic panels",
            Self::CurvedConnectors => "curved connectors",
            Self::SkippedReport => "skipped-line report",
        }
    }

    fn help(self) -> [&'static str; 2] {
        match self {
            Self::WideLayout => [
                "Spreads branches on a larger ring. Off keeps the",
                "compact ring with its 15 degree offset.",
            ],
            Self::Subtopics => [
                "Lists each branch's subtopics beside it, on the",
                "side facing away from the central topic.",
            ],
            Self::CurvedConnectors => [
                "Bends connectors into gentle curves. Off draws",
                "straight lines from parent to child.",
            ],
            Self::SkippedReport => [
                "Shows lines the interpreter ignored, with the",
                "reason, in the side panel.",
            ],
        }
    }

    fn is_on(self, config: &Config) -> bool {
        match self {
            Self::WideLayout => config.layout == LayoutStyle::Wide,
            Self::Subtopics => config.show_subtopics,
            Self::CurvedConnectors => config.curved_connectors,
            Self::SkippedReport => config.show_skipped,
        }
    }

    fn flip(self, config: &mut Config) {
        match self {
            Self::WideLayout => config.layout = config.layout.toggled(),
            Self::Subtopics => config.show_subtopics = !config.show_subtopics,
            Self::CurvedConnectors => config.curved_connectors = !config.curved_connectors,
            Self::SkippedReport => config.show_skipped = !config.show_skipped,
        }
    }
}

const SETTINGS_ROW_COUNT: usize = Toggle::ALL.len();

pub fn handle_key(
    key: KeyEvent,
    state: &mut SettingsPanelState,
    config: &mut Config,
) -> SettingsEvent {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => SettingsEvent::Close,
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected_row = state.selected_row.saturating_sub(1);
            SettingsEvent::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.selected_row = (state.selected_row + 1).min(SETTINGS_ROW_COUNT - 1);
            SettingsEvent::None
        }
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Enter
        | KeyCode::Char(' ') => {
            Toggle::at(state.selected_row).flip(config);
            SettingsEvent::Changed
        }
        _ => SettingsEvent::None,
    }
}

pub fn draw(frame: &mut Frame, state: &SettingsPanelState, config: &Config, persisted: bool) {
    let area = centered_rect(frame.area(), 56, 44);
    frame.render_widget(Clear, area);

    let title = Line::from(vec![
        Span::styled(
            "Setup",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Esc to close", Style::default().fg(Color::Gray)),
    ]);

    let selected = Toggle::at(state.selected_row);
    let mut lines: Vec<Line> = Toggle::ALL
        .iter()
        .map(|toggle| toggle_line(*toggle == selected, toggle.label(), toggle.is_on(config)))
        .collect();
    lines.push(Line::from(""));
    lines.extend(selected.help().map(|text| {
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }));

    let footer = if persisted {
        "Saved to .hoid/config.hoid as you toggle."
    } else {
        "No .hoid project: changes last for this session."
    };
    let hint = Style::default().fg(Color::DarkGray);
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("j/k move, Enter or Space toggles.", hint)),
        Line::from(Span::styled(footer, hint)),
    ]);

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(panel, area);
}

fn toggle_line(selected: bool, label: &str, on: bool) -> Line<'static> {
    let row_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let (mark, mark_color) = if on {
        ("[x]", Color::Green)
    } else {
        ("[ ]", Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(format!(" {mark} "), row_style.fg(mark_color)),
        Span::styled(format!("{label:<26}"), row_style),
    ])
}

pub(crate) fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn toggling_first_row_switches_layout_style() {
        let mut state = SettingsPanelState::default();
        let mut config = Config::default();
        let event = handle_key(press(KeyCode::Enter), &mut state, &mut config);
        assert_eq!(event, SettingsEvent::Changed);
        assert_eq!(config.layout, LayoutStyle::Wide);
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        let mut state = SettingsPanelState::default();
        let mut config = Config::default();
        for _ in 0..10 {
            handle_key(press(KeyCode::Down), &mut state, &mut config);
        }
        assert_eq!(state.selected_row, SETTINGS_ROW_COUNT - 1);
        handle_key(press(KeyCode::Char(' ')), &mut state, &mut config);
        assert!(!config.show_skipped);
    }

    #[test]
    fn escape_closes_without_changes() {
        let mut state = SettingsPanelState::default();
        let mut config = Config::default();
        let event = handle_key(press(KeyCode::Esc), &mut state, &mut config);
        assert_eq!(event, SettingsEvent::Close);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn draw_marks_enabled_toggles_and_footer() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let config = Config::default();
        terminal
            .draw(|f| draw(f, &SettingsPanelState::default(), &config, false))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>() + "\n")
            .collect();
        assert!(screen.contains("[ ] wide layout"), "{screen}");
        assert!(screen.contains("[x] subtopic panels"), "{screen}");
        assert!(screen.contains("changes last for this session"), "{screen}");
    }
}
