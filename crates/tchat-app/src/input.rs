//! Terminal-agnostic keyboard input and the line editor.

/// Longest username accepted on the identity screen, in characters.
pub const USERNAME_CHAR_LIMIT: usize = 156;

/// Longest compose-box message, in characters.
pub const MESSAGE_CHAR_LIMIT: usize = 280;

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries so the state machine
/// can be driven by scripted input in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Ctrl+C (quit).
    Interrupt,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Single-line text input with a character limit.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    limit: usize,
}

impl InputState {
    /// Create an empty input accepting at most `limit` characters.
    pub fn with_limit(limit: usize) -> Self {
        Self { buffer: String::new(), cursor: 0, limit }
    }

    /// Current text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of characters.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// True if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Apply an editing key. Returns `true` if the buffer or cursor changed.
    ///
    /// Enter and the quit keys are not editing keys and are ignored here.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                if self.len() >= self.limit {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                true
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                true
            },
            KeyInput::Delete => {
                if self.cursor >= self.len() {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                true
            },
            KeyInput::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyInput::Right => self.move_to((self.cursor + 1).min(self.len())),
            KeyInput::Home => self.move_to(0),
            KeyInput::End => self.move_to(self.len()),
            KeyInput::Enter | KeyInput::Esc | KeyInput::Interrupt => false,
        }
    }

    /// Take the text out and reset the cursor.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn move_to(&mut self, cursor: usize) -> bool {
        let moved = cursor != self.cursor;
        self.cursor = cursor;
        moved
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}
