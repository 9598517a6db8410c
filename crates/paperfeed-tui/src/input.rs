use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;

/// Map a crossterm terminal event to a TUI action.
pub fn map_event(event: &Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }
            map_key(key)
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => Action::Like,
        KeyCode::Left | KeyCode::Char('h') => Action::Dislike,
        KeyCode::Up | KeyCode::Char('k') => Action::Skip,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Char('H') => Action::ToggleHistory,
        KeyCode::Char('a') => Action::ToggleAuthors,
        KeyCode::Char('m') => Action::ToggleAbstract,
        KeyCode::Char('o') => Action::ShowUrl,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn arrows_and_vim_keys_swipe() {
        assert_eq!(map_event(&press(KeyCode::Right)), Action::Like);
        assert_eq!(map_event(&press(KeyCode::Char('l'))), Action::Like);
        assert_eq!(map_event(&press(KeyCode::Left)), Action::Dislike);
        assert_eq!(map_event(&press(KeyCode::Char('h'))), Action::Dislike);
        assert_eq!(map_event(&press(KeyCode::Up)), Action::Skip);
        assert_eq!(map_event(&press(KeyCode::Char('k'))), Action::Skip);
    }

    #[test]
    fn history_is_shift_h() {
        assert_eq!(map_event(&press(KeyCode::Char('H'))), Action::ToggleHistory);
    }

    #[test]
    fn ctrl_c_quits() {
        let evt = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&evt), Action::Quit);
        assert_eq!(map_event(&press(KeyCode::Char('c'))), Action::None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(key)), Action::None);
    }
}
