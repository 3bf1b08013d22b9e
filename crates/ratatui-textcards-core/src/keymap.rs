use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift
        && pattern.ctrl == event.ctrl
        && pattern.alt == event.alt
        && pattern.meta == event.meta
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::ctrl())
}

pub fn key_meta(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::meta())
}
