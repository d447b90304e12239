//! Keyboard shortcuts for the editing surface.
//!
//! The host translates its native key events into a [`KeyPress`] and asks
//! [`resolve`] what to do with it. Whether the caret is inside a list item is
//! the only context a binding depends on: Tab indents list items and is left
//! to the host everywhere else.

use crate::editing::commands::FormattingCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Tab,
    Enter,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyPress {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            shift: false,
        }
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: true,
            shift: false,
        }
    }

    pub const fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(FormattingCommand),
    Undo,
    Redo,
    InsertText(String),
    LineBreak,
    DeleteBackward,
}

/// Maps a key press to an editor action, or `None` when the editor does not
/// handle it.
pub fn resolve(key: &KeyPress, in_list_item: bool) -> Option<KeyAction> {
    use FormattingCommand as Cmd;

    let action = match (key.code, key.ctrl, key.shift) {
        (KeyCode::Char(c), true, shift) => match (c.to_ascii_lowercase(), shift) {
            ('b', false) => KeyAction::Command(Cmd::ToggleBold),
            ('i', false) => KeyAction::Command(Cmd::ToggleItalic),
            ('u', false) => KeyAction::Command(Cmd::ToggleUnderline),
            ('z', false) => KeyAction::Undo,
            ('z', true) | ('y', false) => KeyAction::Redo,
            // Shifted digits arrive either as the digit or the US-layout symbol
            ('7' | '&', true) => KeyAction::Command(Cmd::ToggleNumberedList),
            ('8' | '*', true) => KeyAction::Command(Cmd::ToggleBulletList),
            _ => return None,
        },
        (KeyCode::Tab, false, false) if in_list_item => KeyAction::Command(Cmd::Indent),
        (KeyCode::Tab, false, true) if in_list_item => KeyAction::Command(Cmd::Outdent),
        (KeyCode::Enter, false, false) => KeyAction::Command(Cmd::InsertParagraphBreak),
        (KeyCode::Enter, false, true) => KeyAction::LineBreak,
        (KeyCode::Backspace, false, _) => KeyAction::DeleteBackward,
        (KeyCode::Char(c), false, _) if !c.is_control() => KeyAction::InsertText(c.to_string()),
        _ => return None,
    };
    Some(action)
}
