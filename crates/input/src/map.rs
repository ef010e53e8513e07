//! Key mapping from terminal events to game key inputs.

use crate::types::{Key, KeyInput, KeyPhase};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key code to a game key. Only the three arrows mean anything.
pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Down => Some(Key::ArrowDown),
        _ => None,
    }
}

/// Map a crossterm event kind to a key phase.
pub fn map_phase(kind: KeyEventKind) -> KeyPhase {
    match kind {
        KeyEventKind::Press => KeyPhase::Press,
        KeyEventKind::Repeat => KeyPhase::Repeat,
        KeyEventKind::Release => KeyPhase::Release,
    }
}

/// Map keyboard input to a game key input.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyInput> {
    map_key(key.code).map(|k| KeyInput::new(k, map_phase(key.kind)))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
