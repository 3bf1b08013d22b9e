use crate::input::KeyEvent;
use crate::keymap;

/// Copy requests produced by the card view.
///
/// This crate does not integrate with any system clipboard. A copy gesture yields
/// `CopyRequested(String)` and the app decides what to do with the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionAction {
    None,
    CopyRequested(String),
}

/// Key bindings for copying selected card text.
///
/// Defaults follow desktop conventions: `Ctrl+C` and `Cmd+C`.
#[derive(Clone, Debug)]
pub struct SelectionBindings {
    pub copy: Vec<KeyEvent>,
}

impl Default for SelectionBindings {
    fn default() -> Self {
        Self {
            copy: vec![keymap::key_ctrl('c'), keymap::key_meta('c')],
        }
    }
}

impl SelectionBindings {
    /// Returns `true` if `key` matches any configured copy binding.
    pub fn is_copy(&self, key: &KeyEvent) -> bool {
        self.copy.iter().any(|p| keymap::key_event_matches(p, key))
    }

    /// Copy action for `key` given the current text selection.
    ///
    /// An empty selection never produces a copy request.
    pub fn action_for(&self, key: &KeyEvent, selected_text: &str) -> SelectionAction {
        if self.is_copy(key) && !selected_text.is_empty() {
            SelectionAction::CopyRequested(selected_text.to_string())
        } else {
            SelectionAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_needs_a_selection() {
        let b = SelectionBindings::default();
        assert_eq!(
            b.action_for(&keymap::key_ctrl('c'), "hello"),
            SelectionAction::CopyRequested("hello".into())
        );
        assert_eq!(
            b.action_for(&keymap::key_meta('c'), "x"),
            SelectionAction::CopyRequested("x".into())
        );
        assert_eq!(b.action_for(&keymap::key_ctrl('c'), ""), SelectionAction::None);
        assert_eq!(b.action_for(&keymap::key_char('c'), "x"), SelectionAction::None);
    }
}
