use crate::runtime::command::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = Self::default();
        bindings.install_defaults();
        bindings
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    /// Bound command for `event`, or the key itself for the focused widget.
    pub fn resolve(&self, event: KeyEvent) -> Command {
        self.bindings
            .get(&KeyBinding::from_event(event))
            .copied()
            .unwrap_or(Command::InputKey(event))
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(KeyBinding::key(KeyCode::Esc), Command::Exit);
        self.bind(KeyBinding::key(KeyCode::Enter), Command::Submit);
    }
}
