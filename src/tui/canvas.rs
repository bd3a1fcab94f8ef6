use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Position;
use ratatui::{Frame, Terminal};
use tracing::{debug, info, warn};

use crate::layout::radial::Layout as MapLayout;
use crate::mindmap::model::ParseResult;
use crate::parser::config::Config;
use crate::parser::mindmap::{self, Interpretation};
use crate::project::{self, STDIN_MARKER};
use crate::tui::input::{self, Action};
use crate::tui::render::{self, MapGeometry, MapRenderData, SidePanel};
use crate::tui::settings::{self, SettingsEvent, SettingsPanelState};
use crate::tui::viewport::ViewState;

const DEMO_MAP: &str = "\
# Photosynthesis
- Light reactions
   * Chlorophyll absorbs light
   * Water is split
   * ATP and NADPH
- Calvin cycle
   * Carbon fixation
   * Glucose synthesis
- Inputs
   * Carbon dioxide
   * Sunlight
- Outputs
   * Oxygen
   * Sugars
- Where it happens
   * Chloroplasts
";

#[derive(Debug)]
struct AppState {
    /// Path or `-`. `None` for the built-in demo map.
    source: Option<String>,
    source_name: String,
    raw_text: String,
    interpretation: Interpretation,
    layout: Option<MapLayout>,
    view: ViewState,
    config: Config,
    /// Project the config was loaded from. Settings are only written back
    /// when there is one.
    config_root: Option<PathBuf>,
    side_panel: SidePanel,
    show_help: bool,
    show_settings: bool,
    /// `hoid setup`: closing the panel quits.
    settings_only: bool,
    settings_state: SettingsPanelState,
    status_message: Option<String>,
    geometry: Option<MapGeometry>,
}

impl AppState {
    fn from_text(
        source: Option<String>,
        raw_text: String,
        config: Config,
        config_root: Option<PathBuf>,
    ) -> Self {
        let source_name = match &source {
            Some(source) => project::display_name(source),
            None => "demo".to_string(),
        };
        let side_panel = if config.show_skipped {
            SidePanel::Skipped
        } else {
            SidePanel::Hidden
        };
        let mut app = Self {
            source,
            source_name,
            raw_text,
            interpretation: Interpretation {
                result: ParseResult::NotParsed,
                skipped: Vec::new(),
            },
            layout: None,
            view: ViewState::default(),
            config,
            config_root,
            side_panel,
            show_help: false,
            show_settings: false,
            settings_only: false,
            settings_state: SettingsPanelState::default(),
            status_message: None,
            geometry: None,
        };
        app.reparse();
        app
    }

    fn load(source: Option<String>, demo: bool) -> Result<Self> {
        let config_root = project::find_root()?;
        let config = project::load_config(config_root.as_deref())?;
        let (source, text) = match source {
            Some(source) if !demo => {
                let text = project::read_input(&source)?;
                (Some(source), text)
            }
            _ => (None, DEMO_MAP.to_string()),
        };
        Ok(Self::from_text(source, text, config, config_root))
    }

    /// Parse the current text from scratch. The view starts over with it.
    fn reparse(&mut self) {
        self.interpretation = mindmap::interpret(&self.raw_text, &self.config.parse_options());
        self.view.reset();
        self.relayout();
        debug!(
            parsed = self.interpretation.result.is_parsed(),
            skipped = self.interpretation.skipped.len(),
            "mind map interpreted"
        );
    }

    fn relayout(&mut self) {
        self.layout = self
            .interpretation
            .result
            .root()
            .map(|root| MapLayout::compute(root, self.config.layout));
    }

    /// Re-read the source file. A failed read keeps the current map on screen
    /// and reports the error in the footer.
    fn reload(&mut self) {
        let Some(source) = self.source.clone().filter(|s| s != STDIN_MARKER) else {
            self.status_message = Some("nothing to reload: not reading from a file".to_string());
            return;
        };
        match project::read_input(&source) {
            Ok(text) => {
                self.raw_text = text;
                self.reparse();
                self.status_message = Some(format!("reloaded {}", self.source_name));
                info!(%source, "reloaded mind map");
            }
            Err(err) => {
                warn!(%source, error = %err, "reload failed");
                self.status_message = Some(format!("reload failed: {err:#}"));
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let data = MapRenderData {
            source_name: &self.source_name,
            layout: self.layout.as_ref(),
            raw_text: &self.raw_text,
            skipped: &self.interpretation.skipped,
            view: &self.view,
            show_subtopics: self.config.show_subtopics,
            curved_connectors: self.config.curved_connectors,
            side_panel: self.side_panel,
            message: self.status_message.as_deref(),
            show_help: self.show_help,
        };
        self.geometry = render::draw(frame, &data);
        if self.show_settings {
            settings::draw(
                frame,
                &self.settings_state,
                &self.config,
                self.config_root.is_some(),
            );
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        self.status_message = None;

        if self.show_settings {
            match settings::handle_key(key, &mut self.settings_state, &mut self.config) {
                SettingsEvent::Changed => self.apply_config_change()?,
                SettingsEvent::Close if self.settings_only => return Ok(true),
                SettingsEvent::Close => self.show_settings = false,
                SettingsEvent::None => {}
            }
            return Ok(false);
        }

        match input::action_for_key(key) {
            Action::Quit => return Ok(true),
            Action::Cancel => self.show_help = false,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::OpenSettings => self.show_settings = true,
            Action::ZoomIn => self.view.zoom_in(),
            Action::ZoomOut => self.view.zoom_out(),
            Action::ResetZoom => self.view.reset(),
            Action::Pan(direction) => {
                if !self.view.pan_step(direction) {
                    self.status_message = Some("zoom in to pan".to_string());
                }
            }
            Action::Reload => self.reload(),
            Action::CycleSidePanel => {
                self.side_panel = self.side_panel.next();
                self.status_message = Some(format!("side panel: {}", self.side_panel.label()));
            }
            Action::Noop => {}
        }
        Ok(false)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_settings {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = self
                    .geometry
                    .is_some_and(|g| g.area.contains(Position::new(mouse.column, mouse.row)));
                if inside {
                    self.view.begin_drag(mouse.column, mouse.row);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(g) = self.geometry {
                    self.view
                        .drag_to(mouse.column, mouse.row, g.units_per_col, g.units_per_row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.view.end_drag(),
            MouseEventKind::ScrollUp => self.view.zoom_in(),
            MouseEventKind::ScrollDown => self.view.zoom_out(),
            _ => {}
        }
    }

    fn apply_config_change(&mut self) -> Result<()> {
        self.relayout();
        self.side_panel = match (self.config.show_skipped, self.side_panel) {
            (true, _) => SidePanel::Skipped,
            (false, SidePanel::Skipped) => SidePanel::Hidden,
            (false, other) => other,
        };
        self.persist_config()
    }

    fn persist_config(&self) -> Result<()> {
        if let Some(root) = &self.config_root {
            project::save_config(root, &self.config)?;
        }
        Ok(())
    }
}

/// Open the interactive viewer on `source` (a path or `-`), or on the demo
/// map when `demo` is set.
pub fn run(source: Option<String>, demo: bool) -> Result<()> {
    if source.is_none() && !demo {
        bail!("nothing to view: pass a FILE, `-` for stdin, or --demo");
    }
    let app = AppState::load(source, demo)?;
    event_loop(app)
}

/// Open only the settings panel for the current project.
pub fn run_setup() -> Result<()> {
    let Some(root) = project::find_root()? else {
        bail!("no .hoid project found (run `hoid init` first)");
    };
    let config = project::load_config(Some(&root))?;
    let mut app = AppState::from_text(None, DEMO_MAP.to_string(), config, Some(root));
    app.show_settings = true;
    app.settings_only = true;
    event_loop(app)
}

fn event_loop(mut app: AppState) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("unable to enter raw mode")?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key)? {
                    break;
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::radial::LayoutStyle;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn demo_app() -> AppState {
        AppState::from_text(None, DEMO_MAP.to_string(), Config::default(), None)
    }

    fn render(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn demo_map_parses_and_lays_out() {
        let app = demo_app();
        let layout = app.layout.as_ref().expect("demo map should parse");
        assert_eq!(layout.root().text, "Photosynthesis");
        assert_eq!(layout.branches().count(), 5);
        assert!(app.interpretation.skipped.is_empty());
    }

    #[test]
    fn keys_zoom_and_reset() {
        let mut app = demo_app();
        app.handle_key(key(KeyCode::Char('+'))).unwrap();
        app.handle_key(key(KeyCode::Char('='))).unwrap();
        assert_eq!(app.view.percent(), 140);
        app.handle_key(key(KeyCode::Right)).unwrap();
        assert!(app.view.pan().x < 0.0);
        app.handle_key(key(KeyCode::Char('0'))).unwrap();
        assert_eq!(app.view, ViewState::default());
    }

    #[test]
    fn panning_at_default_zoom_explains_why_not() {
        let mut app = demo_app();
        app.handle_key(key(KeyCode::Left)).unwrap();
        assert_eq!(app.status_message.as_deref(), Some("zoom in to pan"));
        assert_eq!(app.view, ViewState::default());
    }

    #[test]
    fn mouse_drag_pans_inside_map_only_when_zoomed() {
        let mut app = demo_app();
        render(&mut app);
        let area = app.geometry.expect("geometry after draw").area;
        let (col, row) = (area.x + area.width / 2, area.y + area.height / 2);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        assert!(!app.view.is_dragging());

        app.handle_mouse(mouse(MouseEventKind::ScrollUp, col, row));
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        assert!(app.view.is_dragging());
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), col + 3, row));
        assert!(app.view.pan().x > 0.0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), col + 3, row));
        assert!(!app.view.is_dragging());

        app.handle_mouse(mouse(MouseEventKind::ScrollDown, col, row));
        assert_eq!(app.view.pan(), ViewState::default().pan());
    }

    #[test]
    fn settings_change_relayouts_and_persists() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(project::hoid_dir(dir.path())).unwrap();
        let mut app = AppState::from_text(
            None,
            DEMO_MAP.to_string(),
            Config::default(),
            Some(dir.path().to_path_buf()),
        );
        app.handle_key(key(KeyCode::Char('s'))).unwrap();
        assert!(app.show_settings);
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.layout.as_ref().unwrap().style, LayoutStyle::Wide);

        let saved = project::load_config(Some(dir.path())).unwrap();
        assert_eq!(saved.layout, LayoutStyle::Wide);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.show_settings);
    }

    #[test]
    fn turning_off_skipped_report_hides_its_panel() {
        let mut app = demo_app();
        assert_eq!(app.side_panel, SidePanel::Skipped);
        app.show_settings = true;
        app.settings_state.selected_row = 3;
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!app.config.show_skipped);
        assert_eq!(app.side_panel, SidePanel::Hidden);
    }

    #[test]
    fn setup_mode_quits_when_settings_close() {
        let mut app = demo_app();
        app.show_settings = true;
        app.settings_only = true;
        assert!(app.handle_key(key(KeyCode::Esc)).unwrap());
    }

    #[test]
    fn reload_rereads_file_and_resets_view() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.txt");
        fs::write(&path, "# First\n- A\n").unwrap();
        let source = path.to_string_lossy().to_string();
        let text = project::read_input(&source).unwrap();
        let mut app = AppState::from_text(Some(source), text, Config::default(), None);
        app.view.zoom_in();

        fs::write(&path, "# Second\n- A\n- B\n").unwrap();
        app.handle_key(key(KeyCode::Char('r'))).unwrap();
        let layout = app.layout.as_ref().unwrap();
        assert_eq!(layout.root().text, "Second");
        assert_eq!(layout.branches().count(), 2);
        assert_eq!(app.view, ViewState::default());
    }

    #[test]
    fn failed_reload_keeps_map_and_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.txt");
        fs::write(&path, "# Kept\n- A\n").unwrap();
        let source = path.to_string_lossy().to_string();
        let text = project::read_input(&source).unwrap();
        let mut app = AppState::from_text(Some(source), text, Config::default(), None);

        fs::remove_file(&path).unwrap();
        let quit = app.handle_key(key(KeyCode::Char('r'))).unwrap();
        assert!(!quit);
        assert_eq!(app.layout.as_ref().unwrap().root().text, "Kept");
        assert!(
            app.status_message
                .as_deref()
                .is_some_and(|m| m.starts_with("reload failed")),
            "{:?}",
            app.status_message
        );
    }

    #[test]
    fn reload_without_file_is_a_no_op() {
        let mut app = demo_app();
        app.handle_key(key(KeyCode::Char('r'))).unwrap();
        assert!(
            app.status_message
                .as_deref()
                .is_some_and(|m| m.starts_with("nothing to reload"))
        );
    }

    #[test]
    fn unparsed_text_renders_fallback() {
        let mut app = AppState::from_text(
            Some("notes.txt".to_string()),
            "no structure here".to_string(),
            Config::default(),
            None,
        );
        assert!(app.layout.is_none());
        let screen = render(&mut app);
        assert!(screen.contains("Could not visualize this mind map"), "{screen}");
        assert!(screen.contains("notes.txt"), "{screen}");
    }

    #[test]
    fn view_requires_a_source_or_demo() {
        assert!(run(None, false).is_err());
    }
}
