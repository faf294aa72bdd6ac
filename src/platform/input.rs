//! Polled input state
//!
//! Browser event handlers write into [`InputState`]; the frame loop reads a
//! single [`Intent`] from it once per simulation frame.

use crate::sim::Intent;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Activate,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Enter" => Some(Key::Activate),
            _ => None,
        }
    }
}

/// Keyboard and pointer state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    /// Held pointer direction (-1, 0 or 1)
    pointer: i8,
    /// Pending activate press, consumed once
    activate: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Activate => self.activate = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Activate => {}
        }
    }

    /// Pointer pressed at `x` on a surface `width` wide; the half decides the
    /// direction. A press is also an activate.
    pub fn pointer_down(&mut self, x: f32, width: f32) {
        self.pointer = if x < width / 2.0 { -1 } else { 1 };
        self.activate = true;
    }

    pub fn pointer_up(&mut self) {
        self.pointer = 0;
    }

    /// Current horizontal intent; a held pointer overrides the keyboard
    pub fn intent(&self) -> Intent {
        if self.pointer != 0 {
            return Intent::from_axis(self.pointer);
        }
        // Right wins when both keys are held
        if self.right {
            Intent::Right
        } else if self.left {
            Intent::Left
        } else {
            Intent::None
        }
    }

    /// Consume the pending activate press
    pub fn take_activate(&mut self) -> bool {
        std::mem::take(&mut self.activate)
    }

    /// Drop all held state (e.g. when the page loses focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_intent() {
        let mut input = InputState::new();
        assert_eq!(input.intent(), Intent::None);
        input.key_down(Key::Left);
        assert_eq!(input.intent(), Intent::Left);
        input.key_down(Key::Right);
        assert_eq!(input.intent(), Intent::Right);
        input.key_up(Key::Right);
        assert_eq!(input.intent(), Intent::Left);
    }

    #[test]
    fn test_pointer_takes_precedence() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.pointer_down(50.0, 400.0);
        assert_eq!(input.intent(), Intent::Left);
        input.pointer_up();
        assert_eq!(input.intent(), Intent::Right);
    }

    #[test]
    fn test_activate_is_edge_triggered() {
        let mut input = InputState::new();
        input.key_down(Key::Activate);
        assert!(input.take_activate());
        assert!(!input.take_activate());

        input.pointer_down(300.0, 400.0);
        assert!(input.take_activate());
        assert_eq!(input.intent(), Intent::Right);
    }

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom("d"), Some(Key::Right));
        assert_eq!(Key::from_dom(" "), Some(Key::Activate));
        assert_eq!(Key::from_dom("q"), None);
    }
}
