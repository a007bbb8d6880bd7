use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Controls, Direction, Input};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameInput(Input),
    Quit,
    None,
}

/// Maps key presses to engine input for whichever control set is active.
///
/// The arrow keys mean different things per phase: before the start ↑ and ↓
/// change the speed, while running they steer.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, controls: Controls) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
            _ => {}
        }

        match controls {
            Controls::Setup => Self::setup_key(key.code),
            Controls::Steering => Self::steering_key(key.code),
            Controls::Locked => KeyAction::None,
        }
    }

    fn setup_key(code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Up => KeyAction::GameInput(Input::SpeedUp),
            KeyCode::Down => KeyAction::GameInput(Input::SpeedDown),
            KeyCode::Char(' ') => KeyAction::GameInput(Input::Start),
            _ => KeyAction::None,
        }
    }

    fn steering_key(code: KeyCode) -> KeyAction {
        let direction = match code {
            // Movement - Arrow keys
            KeyCode::Up => Direction::Up,
            KeyCode::Down => Direction::Down,
            KeyCode::Left => Direction::Left,
            KeyCode::Right => Direction::Right,

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Direction::Up,
            KeyCode::Char('s') | KeyCode::Char('S') => Direction::Down,
            KeyCode::Char('a') | KeyCode::Char('A') => Direction::Left,
            KeyCode::Char('d') | KeyCode::Char('D') => Direction::Right,

            _ => return KeyAction::None,
        };
        KeyAction::GameInput(direction.into())
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_setup_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Up), Controls::Setup),
            KeyAction::GameInput(Input::SpeedUp)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Down), Controls::Setup),
            KeyAction::GameInput(Input::SpeedDown)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char(' ')), Controls::Setup),
            KeyAction::GameInput(Input::Start)
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Left), Controls::Setup),
            KeyAction::None
        );
    }

    #[test]
    fn test_arrow_keys_steer_while_running() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Up), Controls::Steering),
            KeyAction::GameInput(Input::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Down), Controls::Steering),
            KeyAction::GameInput(Input::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Left), Controls::Steering),
            KeyAction::GameInput(Input::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Right), Controls::Steering),
            KeyAction::GameInput(Input::Turn(Direction::Right))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char(' ')), Controls::Steering),
            KeyAction::None
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper, Controls::Steering),
            KeyAction::GameInput(Input::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('a')), Controls::Steering),
            KeyAction::GameInput(Input::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('w')), Controls::Setup),
            KeyAction::None
        );
    }

    #[test]
    fn test_locked_controls() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Up), Controls::Locked),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Esc), Controls::Locked),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        for controls in [Controls::Setup, Controls::Steering, Controls::Locked] {
            assert_eq!(
                handler.handle_key_event(key(KeyCode::Char('q')), controls),
                KeyAction::Quit
            );
            let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
            assert_eq!(handler.handle_key_event(ctrl_c, controls), KeyAction::Quit);
        }
    }
}
