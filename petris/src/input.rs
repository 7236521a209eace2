use serde::{Deserialize, Serialize};

use crate::piece::Rotation;

/// Direction keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Down,
    Rotate,
}

impl Key {
    /// Map a browser key code (arrow keys) to a game key. Anything else is ignored.
    pub fn from_key_code(code: u32) -> Option<Key> {
        match code {
            37 => Some(Key::Left),
            38 => Some(Key::Rotate),
            39 => Some(Key::Right),
            40 => Some(Key::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    pub fn dx(&self) -> isize {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// Intents captured between two ticks
///
/// Horizontal movement and soft drop stay set until the key is released.
/// A rotation is consumed by the tick that applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingInput {
    pub horizontal: Option<Shift>,
    pub soft_drop: bool,
    pub rotate: Option<Rotation>,
}

impl PendingInput {
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.horizontal = Some(Shift::Left),
            Key::Right => self.horizontal = Some(Shift::Right),
            Key::Down => self.soft_drop = true,
            Key::Rotate => self.rotate = Some(Rotation::CounterClockwise),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left | Key::Right => self.horizontal = None,
            Key::Down => self.soft_drop = false,
            Key::Rotate => {}
        }
    }

    pub fn clear(&mut self) {
        *self = PendingInput::default();
    }

    pub fn is_idle(&self) -> bool {
        self.horizontal.is_none() && !self.soft_drop && self.rotate.is_none()
    }
}
