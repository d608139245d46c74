/// Modifier keys held during a click or key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: false,
    };

    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
        shift: true,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

/// An editor action bound to a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    DeleteSelection,
    Cancel,
    Undo,
    Redo,
    SelectAll,
    Copy,
    Paste,
    Duplicate,
}

impl Shortcut {
    /// Resolves a key press to a shortcut, if it is bound to one.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        match key {
            Key::Delete | Key::Backspace => Some(Shortcut::DeleteSelection),
            Key::Escape => Some(Shortcut::Cancel),
            Key::Char(c) if modifiers.command() => match (c.to_ascii_lowercase(), modifiers.shift) {
                ('z', false) => Some(Shortcut::Undo),
                ('z', true) | ('y', _) => Some(Shortcut::Redo),
                ('a', _) => Some(Shortcut::SelectAll),
                ('c', _) => Some(Shortcut::Copy),
                ('v', _) => Some(Shortcut::Paste),
                ('d', _) => Some(Shortcut::Duplicate),
                _ => None,
            },
            Key::Char(_) => None,
        }
    }

    /// Whether running this shortcut can change the graph or its history.
    pub fn edits_graph(&self) -> bool {
        !matches!(self, Shortcut::Cancel | Shortcut::SelectAll | Shortcut::Copy)
    }
}
