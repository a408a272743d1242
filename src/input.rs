//! Key bindings: arrows plus the classic a/d/s + j/k layout.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Player command from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Quit,
    None,
}

/// Map a key event to a command. Unrecognised keys are `Command::None`.
pub fn command_for(key: KeyEvent) -> Command {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Command::None;
    }
    match code {
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Command::Quit,
        KeyCode::Left | KeyCode::Char('a' | 'A') => Command::MoveLeft,
        KeyCode::Right | KeyCode::Char('d' | 'D') => Command::MoveRight,
        KeyCode::Down | KeyCode::Char('s' | 'S') => Command::SoftDrop,
        KeyCode::Enter | KeyCode::Char(' ') => Command::HardDrop,
        KeyCode::Char('k' | 'K') => Command::RotateCw,
        KeyCode::Char('j' | 'J') => Command::RotateCcw,
        _ => Command::None,
    }
}
