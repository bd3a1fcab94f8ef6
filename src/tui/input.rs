use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Reload,
    CycleSidePanel,
    OpenSettings,
    ToggleHelp,
    Cancel,
    Quit,
    Noop,
}

pub fn action_for_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Pan(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::Pan(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Action::Pan(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::Pan(Direction::Right),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') | KeyCode::Char('_') => Action::ZoomOut,
        KeyCode::Char('0') => Action::ResetZoom,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('t') => Action::CycleSidePanel,
        KeyCode::Char('s') => Action::OpenSettings,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn zoom_keys_map_to_zoom_actions() {
        assert_eq!(action_for_key(key(KeyCode::Char('+'))), Action::ZoomIn);
        assert_eq!(action_for_key(key(KeyCode::Char('='))), Action::ZoomIn);
        assert_eq!(action_for_key(key(KeyCode::Char('-'))), Action::ZoomOut);
        assert_eq!(action_for_key(key(KeyCode::Char('0'))), Action::ResetZoom);
    }

    #[test]
    fn vim_keys_pan() {
        assert_eq!(
            action_for_key(key(KeyCode::Char('h'))),
            Action::Pan(Direction::Left)
        );
        assert_eq!(
            action_for_key(key(KeyCode::Down)),
            Action::Pan(Direction::Down)
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(ev), Action::Quit);
        assert_eq!(action_for_key(key(KeyCode::Char('c'))), Action::Noop);
    }
}
