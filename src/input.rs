use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

/// What a key press means, before looking at the game state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Pause,
    Steer(Direction),
    Other,
}

/// The clickable controls.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Start,
    Pause,
    Reset,
    Restart,
}

pub fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char(' ') | KeyCode::Esc => KeyAction::Pause,
        KeyCode::Char('w') | KeyCode::Up => KeyAction::Steer(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => KeyAction::Steer(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => KeyAction::Steer(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => KeyAction::Steer(Direction::Right),
        _ => KeyAction::Other,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_steer() {
        assert_eq!(key_action(&key(KeyCode::Up)), KeyAction::Steer(Direction::Up));
        assert_eq!(key_action(&key(KeyCode::Char('a'))), KeyAction::Steer(Direction::Left));
        assert_eq!(key_action(&key(KeyCode::Down)), KeyAction::Steer(Direction::Down));
        assert_eq!(key_action(&key(KeyCode::Char('d'))), KeyAction::Steer(Direction::Right));
    }

    #[test]
    fn space_and_esc_pause() {
        assert_eq!(key_action(&key(KeyCode::Char(' '))), KeyAction::Pause);
        assert_eq!(key_action(&key(KeyCode::Esc)), KeyAction::Pause);
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_does_not() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&ctrl_c), KeyAction::Quit);
        assert_eq!(key_action(&key(KeyCode::Char('c'))), KeyAction::Other);
        assert_eq!(key_action(&key(KeyCode::Enter)), KeyAction::Other);
    }
}
