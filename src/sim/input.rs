//! Input vocabulary
//!
//! The host captures the keyboard and feeds key transitions in; the kernel
//! only reads `pressed` / `just_pressed`. Call `end_frame` after each tick.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    /// Debug overlay toggle
    Debug,
}

impl Input {
    pub const ALL: [Input; 5] = [Input::Up, Input::Down, Input::Left, Input::Right, Input::Debug];

    /// Keyboard mapping used by the browser build of the game
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" | "ArrowUp" => Some(Input::Up),
            "s" | "ArrowDown" => Some(Input::Down),
            "a" | "ArrowLeft" => Some(Input::Left),
            "d" | "ArrowRight" => Some(Input::Right),
            "p" => Some(Input::Debug),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pressed: [bool; 5],
    just_pressed: [bool; 5],
}

impl InputState {
    pub fn pressed(&self, input: Input) -> bool {
        self.pressed[input.index()]
    }

    /// Went down since the last `end_frame`
    pub fn just_pressed(&self, input: Input) -> bool {
        self.just_pressed[input.index()]
    }

    /// Key went down. A repeat while already held is not a new press.
    pub fn press(&mut self, input: Input) {
        let i = input.index();
        if !self.pressed[i] {
            self.just_pressed[i] = true;
        }
        self.pressed[i] = true;
    }

    pub fn release(&mut self, input: Input) {
        self.pressed[input.index()] = false;
        self.just_pressed[input.index()] = false;
    }

    pub fn end_frame(&mut self) {
        self.just_pressed = [false; 5];
    }

    pub fn any_direction(&self) -> bool {
        [Input::Up, Input::Down, Input::Left, Input::Right]
            .into_iter()
            .any(|input| self.pressed(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_lasts_one_frame() {
        let mut input = InputState::default();
        input.press(Input::Up);
        assert!(input.pressed(Input::Up));
        assert!(input.just_pressed(Input::Up));

        input.end_frame();
        assert!(input.pressed(Input::Up));
        assert!(!input.just_pressed(Input::Up));

        input.release(Input::Up);
        assert!(!input.pressed(Input::Up));
    }

    #[test]
    fn test_key_repeat_is_not_a_new_press() {
        let mut input = InputState::default();
        input.press(Input::Debug);
        input.end_frame();
        input.press(Input::Debug);
        assert!(input.pressed(Input::Debug));
        assert!(!input.just_pressed(Input::Debug));

        input.release(Input::Debug);
        input.press(Input::Debug);
        assert!(input.just_pressed(Input::Debug));
    }

    #[test]
    fn test_debug_is_not_a_direction() {
        let mut input = InputState::default();
        input.press(Input::Debug);
        assert!(!input.any_direction());
        input.press(Input::Left);
        assert!(input.any_direction());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Input::from_key("ArrowLeft"), Some(Input::Left));
        assert_eq!(Input::from_key("d"), Some(Input::Right));
        assert_eq!(Input::from_key("p"), Some(Input::Debug));
        assert_eq!(Input::from_key("q"), None);
        assert_eq!(Input::ALL.len(), 5);
    }
}
