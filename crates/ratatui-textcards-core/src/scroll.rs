use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    Up,
    Down,
}

/// Keyboard scrolling of the card container.
#[derive(Clone, Debug)]
pub struct ScrollBindings {
    /// Distance scrolled per key press, in container units.
    pub line_step: i32,
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
}

impl Default for ScrollBindings {
    fn default() -> Self {
        Self {
            line_step: 100,
            up: vec![keymap::key(KeyCode::Up)],
            down: vec![keymap::key(KeyCode::Down)],
        }
    }
}

impl ScrollBindings {
    pub fn with_step(mut self, line_step: i32) -> Self {
        self.line_step = line_step;
        self
    }

    pub fn action_for(&self, key: &KeyEvent) -> Option<ScrollAction> {
        if self.up.iter().any(|p| keymap::key_event_matches(p, key)) {
            return Some(ScrollAction::Up);
        }
        if self.down.iter().any(|p| keymap::key_event_matches(p, key)) {
            return Some(ScrollAction::Down);
        }
        None
    }

    /// Signed scroll distance of `action`.
    pub fn delta(&self, action: ScrollAction) -> i32 {
        match action {
            ScrollAction::Up => -self.line_step,
            ScrollAction::Down => self.line_step,
        }
    }
}
