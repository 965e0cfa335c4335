//! Keyboard bindings for the sandbox.
//!
//! This module owns the keyboard-to-command mapping so the rest of the
//! application stays agnostic about concrete keys or `crossterm` events.
//! Tracker buttons take Ctrl or Alt as their modifier.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracker_core::Bearing;
use tracker_runtime::Button;

/// High-level outcome of processing a keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Tracker button, with the modifier flag.
    Tracker(Button, bool),
    /// Manual one-tile step.
    Walk(Bearing),
    /// Opens or closes the pause menu, which blocks tracker input.
    ToggleMenu,
    /// No meaningful command was produced.
    None,
}

#[derive(Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Converts a raw key event into a higher-level command.
    pub fn handle_key(&self, key: KeyEvent) -> KeyAction {
        let modifier = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char(ch) => self.handle_char(ch, modifier),
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Left => KeyAction::Walk(Bearing::West),
            KeyCode::Right => KeyAction::Walk(Bearing::East),
            KeyCode::Up => KeyAction::Walk(Bearing::North),
            KeyCode::Down => KeyAction::Walk(Bearing::South),
            KeyCode::PageUp => KeyAction::Tracker(Button::CycleUp, modifier),
            KeyCode::PageDown => KeyAction::Tracker(Button::CycleDown, modifier),
            KeyCode::Enter => KeyAction::Tracker(Button::Read, modifier),
            _ => KeyAction::None,
        }
    }

    fn handle_char(&self, raw: char, modifier: bool) -> KeyAction {
        let ch = raw.to_ascii_lowercase();
        match ch {
            'q' => KeyAction::Quit,
            'm' => KeyAction::ToggleMenu,
            'h' | 'a' => KeyAction::Walk(Bearing::West),
            'j' | 's' => KeyAction::Walk(Bearing::South),
            'k' | 'w' => KeyAction::Walk(Bearing::North),
            'l' | 'd' => KeyAction::Walk(Bearing::East),
            'r' => KeyAction::Tracker(Button::Read, modifier),
            't' => KeyAction::Tracker(Button::ReadTile, modifier),
            '[' => KeyAction::Tracker(Button::CycleUp, modifier),
            ']' => KeyAction::Tracker(Button::CycleDown, modifier),
            // Shifted brackets stand in for the modifier on terminals that
            // swallow Ctrl+[.
            '{' => KeyAction::Tracker(Button::CycleUp, true),
            '}' => KeyAction::Tracker(Button::CycleDown, true),
            'o' => KeyAction::Tracker(Button::ToggleSort, modifier),
            _ => KeyAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        key_with(code, KeyModifiers::empty())
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_tracker_buttons() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('r'))),
            KeyAction::Tracker(Button::Read, false)
        );
        assert_eq!(
            handler.handle_key(key_with(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            KeyAction::Tracker(Button::Read, true)
        );
        assert_eq!(
            handler.handle_key(key_with(KeyCode::PageDown, KeyModifiers::ALT)),
            KeyAction::Tracker(Button::CycleDown, true)
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('}'))),
            KeyAction::Tracker(Button::CycleDown, true)
        );
    }

    #[test]
    fn maps_movement_keys() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('W'))),
            KeyAction::Walk(Bearing::North)
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Left)),
            KeyAction::Walk(Bearing::West)
        );
    }

    #[test]
    fn maps_quit_and_menu() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            handler.handle_key(key_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('m'))),
            KeyAction::ToggleMenu
        );
    }

    #[test]
    fn ignores_unknown_keys() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('z'))), KeyAction::None);
        assert_eq!(handler.handle_key(key(KeyCode::Tab)), KeyAction::None);
    }
}
