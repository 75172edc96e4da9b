//! Scripted console double: replays a fixed key stream and captures every
//! frame the editor writes.

use core_terminal::{Console, KeyEvent, TerminalError};
use std::collections::VecDeque;

pub struct ScriptedConsole {
    keys: VecDeque<KeyEvent>,
    pub output: Vec<u8>,
    pub size: (u16, u16),
}

impl ScriptedConsole {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            keys: VecDeque::new(),
            output: Vec::new(),
            size: (rows, cols),
        }
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.keys.push_back(key);
    }

    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = KeyEvent>) {
        self.keys.extend(keys);
    }

    /// Queue one `Char` key per character.
    pub fn type_str(&mut self, text: &str) {
        self.keys.extend(text.chars().map(KeyEvent::Char));
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Console for ScriptedConsole {
    fn read_key(&mut self) -> Result<KeyEvent, TerminalError> {
        self.keys.pop_front().ok_or_else(|| {
            TerminalError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "key script exhausted",
            ))
        })
    }

    fn window_size(&mut self) -> Result<(u16, u16), TerminalError> {
        Ok(self.size)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TerminalError> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }
}
