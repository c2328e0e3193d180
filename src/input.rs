//! Raw input to simulation commands
//!
//! Keys are tracked as held sets so OS key repeat doesn't re-fire one-shot
//! actions: a key maps to a command only on the transition to down (or, for
//! the jump key, also on release).

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::{AbilityKey, Command, PointerButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Left,
    Right,
    Q,
    W,
    E,
    P,
    H,
}

/// Event as delivered by the host window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { button: PointerButton, position: Vec2 },
    PointerUp { button: PointerButton },
    PointerMove(Vec2),
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pointer_held: HashSet<PointerButton>,
    pub pointer_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_pointer_down(&self) -> bool {
        !self.pointer_held.is_empty()
    }

    /// Update held state and return the command this event stands for, if any
    pub fn handle(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::KeyDown(key) => {
                if !self.held.insert(key) {
                    // Repeat
                    return None;
                }
                key_command(key)
            }
            InputEvent::KeyUp(key) => {
                if !self.held.remove(&key) {
                    return None;
                }
                (key == Key::Space).then_some(Command::Release)
            }
            InputEvent::PointerDown { button, position } => {
                self.pointer_position = position;
                self.pointer_held.insert(button).then_some(Command::Pointer(button))
            }
            InputEvent::PointerUp { button } => {
                self.pointer_held.remove(&button);
                None
            }
            InputEvent::PointerMove(position) => {
                self.pointer_position = position;
                None
            }
        }
    }
}

fn key_command(key: Key) -> Option<Command> {
    match key {
        Key::Space => Some(Command::Jump),
        Key::Left => Some(Command::Cycle(1)),
        Key::Right => Some(Command::Cycle(-1)),
        Key::Q => Some(Command::Ability(AbilityKey::Q)),
        Key::W => Some(Command::Ability(AbilityKey::W)),
        // Third slot has no binding
        Key::E => None,
        Key::P => Some(Command::Pause),
        Key::H => Some(Command::ToggleHighscores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut input = InputState::new();
        assert_eq!(input.handle(InputEvent::KeyDown(Key::Space)), Some(Command::Jump));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::Left)), Some(Command::Cycle(1)));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::Right)), Some(Command::Cycle(-1)));
        assert_eq!(
            input.handle(InputEvent::KeyDown(Key::W)),
            Some(Command::Ability(AbilityKey::W))
        );
        assert_eq!(input.handle(InputEvent::KeyDown(Key::E)), None);
        assert_eq!(input.handle(InputEvent::KeyDown(Key::H)), Some(Command::ToggleHighscores));
    }

    #[test]
    fn test_repeat_is_ignored() {
        let mut input = InputState::new();
        assert_eq!(
            input.handle(InputEvent::KeyDown(Key::Q)),
            Some(Command::Ability(AbilityKey::Q))
        );
        assert_eq!(input.handle(InputEvent::KeyDown(Key::Q)), None);
        assert!(input.is_held(Key::Q));

        input.handle(InputEvent::KeyUp(Key::Q));
        assert_eq!(
            input.handle(InputEvent::KeyDown(Key::Q)),
            Some(Command::Ability(AbilityKey::Q))
        );
    }

    #[test]
    fn test_space_release() {
        let mut input = InputState::new();
        assert_eq!(input.handle(InputEvent::KeyUp(Key::Space)), None);
        input.handle(InputEvent::KeyDown(Key::Space));
        assert_eq!(input.handle(InputEvent::KeyUp(Key::Space)), Some(Command::Release));
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn test_pointer() {
        let mut input = InputState::new();
        let down = InputEvent::PointerDown {
            button: PointerButton::Secondary,
            position: Vec2::new(10.0, 20.0),
        };
        assert_eq!(input.handle(down), Some(Command::Pointer(PointerButton::Secondary)));
        assert!(input.is_pointer_down());
        assert_eq!(input.pointer_position, Vec2::new(10.0, 20.0));
        assert_eq!(input.handle(down), None);

        input.handle(InputEvent::PointerUp {
            button: PointerButton::Secondary,
        });
        assert!(!input.is_pointer_down());
    }
}
