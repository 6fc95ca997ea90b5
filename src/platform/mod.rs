//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes and touch buttons to `TickInput`)
//! - The wasm-bindgen surface used by the JS presentation layer

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::TickInput;

/// Logical buttons the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    /// Jump or shoot
    Primary,
    Pause,
}

impl Button {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Button::Left),
            "ArrowRight" | "KeyD" => Some(Button::Right),
            "Space" | "ArrowUp" | "KeyZ" => Some(Button::Primary),
            "Escape" => Some(Button::Pause),
            _ => None,
        }
    }
}

/// Held keys plus one-shot presses, sampled once per host frame.
///
/// Touch buttons and a virtual joystick feed the same state through
/// `set_button`, so the simulation never knows where input came from.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    primary_held: bool,
    primary_pressed: bool,
    pause_pressed: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key down/up by DOM code. Returns false for keys the game ignores.
    pub fn key(&mut self, code: &str, down: bool) -> bool {
        match Button::from_code(code) {
            Some(button) => {
                self.set_button(button, down);
                true
            }
            None => false,
        }
    }

    pub fn set_button(&mut self, button: Button, down: bool) {
        match button {
            Button::Left => self.left = down,
            Button::Right => self.right = down,
            Button::Primary => {
                // Auto-repeat keydowns do not count as new presses
                if down && !self.primary_held {
                    self.primary_pressed = true;
                }
                self.primary_held = down;
            }
            Button::Pause => {
                if down {
                    self.pause_pressed = true;
                }
            }
        }
    }

    /// Horizontal joystick axis; a dead zone around the center reads as idle
    pub fn set_axis(&mut self, x: f32, dead_zone: f32) {
        self.left = x < -dead_zone;
        self.right = x > dead_zone;
    }

    /// Release everything (window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Input for this host frame; one-shot presses are consumed
    pub fn take_input(&mut self) -> TickInput {
        TickInput {
            move_left: self.left,
            move_right: self.right,
            primary: std::mem::take(&mut self.primary_pressed),
            pause: std::mem::take(&mut self.pause_pressed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Button::from_code("KeyA"), Some(Button::Left));
        assert_eq!(Button::from_code("ArrowRight"), Some(Button::Right));
        assert_eq!(Button::from_code("Space"), Some(Button::Primary));
        assert_eq!(Button::from_code("KeyZ"), Some(Button::Primary));
        assert_eq!(Button::from_code("Escape"), Some(Button::Pause));
        assert_eq!(Button::from_code("KeyQ"), None);
    }

    #[test]
    fn test_held_keys_persist() {
        let mut keys = KeyState::new();
        keys.key("ArrowLeft", true);
        assert!(keys.take_input().move_left);
        assert!(keys.take_input().move_left);
        keys.key("ArrowLeft", false);
        assert!(!keys.take_input().move_left);
    }

    #[test]
    fn test_primary_is_one_shot() {
        let mut keys = KeyState::new();
        keys.key("Space", true);
        // Auto-repeat
        keys.key("Space", true);
        assert!(keys.take_input().primary);
        assert!(!keys.take_input().primary);

        keys.key("Space", false);
        keys.key("Space", true);
        assert!(keys.take_input().primary);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut keys = KeyState::new();
        keys.key("Escape", true);
        keys.key("Escape", false);
        assert!(keys.take_input().pause);
        assert!(!keys.take_input().pause);
    }

    #[test]
    fn test_axis_dead_zone() {
        let mut keys = KeyState::new();
        keys.set_axis(0.1, 0.2);
        let input = keys.take_input();
        assert!(!input.move_left && !input.move_right);
        keys.set_axis(-0.9, 0.2);
        assert!(keys.take_input().move_left);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut keys = KeyState::new();
        assert!(!keys.key("F5", true));
        assert_eq!(keys.take_input(), TickInput::default());
    }
}
