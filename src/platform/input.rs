//! Keyboard state
//!
//! Browser key events update a `KeyState`; the frame loop polls it once per
//! tick with [`KeyState::take_input`].

use crate::sim::TickInput;

/// Held movement keys plus a latched fire press
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    fire_pending: bool,
}

/// What a key name means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Fire,
    /// Toggle sound (handled by the host, not the tick)
    Mute,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(KeyAction::Left),
            "ArrowRight" | "d" | "D" => Some(KeyAction::Right),
            " " | "Spacebar" => Some(KeyAction::Fire),
            "m" | "M" => Some(KeyAction::Mute),
            _ => None,
        }
    }
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keydown. Returns true if the key is bound (caller may suppress scrolling).
    pub fn key_down(&mut self, key: &str) -> bool {
        match KeyAction::from_key(key) {
            Some(KeyAction::Left) => self.left = true,
            Some(KeyAction::Right) => self.right = true,
            Some(KeyAction::Fire) => self.fire_pending = true,
            Some(KeyAction::Mute) => {}
            None => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match KeyAction::from_key(key) {
            Some(KeyAction::Left) => self.left = false,
            Some(KeyAction::Right) => self.right = false,
            Some(KeyAction::Fire | KeyAction::Mute) => {}
            None => return false,
        }
        true
    }

    /// Drop all held keys (focus loss, restart)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Snapshot intents for one tick, consuming the fire press
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left,
            move_right: self.right,
            fire: self.fire_pending,
        };
        self.fire_pending = false;
        input
    }
}
