//! The query line being edited by the user.
use std::ops::Deref;

use unicode_display_width::width as display_width;

/// Default capacity of the query, in bytes
pub const DEFAULT_CAPACITY: usize = 8191;

/// Editable query text with a caret.
///
/// The caret is a byte offset that always sits on a char boundary. The text never grows
/// past `capacity` bytes: an insertion that would overflow is rejected as a whole.
#[derive(Debug, Clone)]
pub struct Input {
    value: String,
    cursor_pos: usize,
    capacity: usize,
}

impl Default for Input {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Input {
    /// Creates an empty input holding at most `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            value: String::new(),
            cursor_pos: 0,
            capacity,
        }
    }

    /// Inserts a char at the caret. Returns false if it does not fit.
    pub fn insert(&mut self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    /// Inserts a string at the caret. Returns false (and changes nothing) if it does not fit.
    pub fn insert_str(&mut self, s: &str) -> bool {
        if self.value.len() + s.len() > self.capacity {
            debug!("input: rejecting insert of {} bytes, capacity {}", s.len(), self.capacity);
            return false;
        }
        self.value.insert_str(self.cursor_pos, s);
        self.cursor_pos += s.len();
        true
    }

    /// Inserts pasted text up to its first newline
    pub fn paste(&mut self, s: &str) -> bool {
        let line = s.split('\n').next().unwrap_or_default();
        self.insert_str(line)
    }

    /// Deletes the char before the caret
    pub fn delete_backward(&mut self) -> Option<char> {
        if self.cursor_pos == 0 {
            return None;
        }
        self.move_cursor(-1);
        Some(self.value.remove(self.cursor_pos))
    }

    /// Deletes the char under the caret
    pub fn delete_forward(&mut self) -> Option<char> {
        if self.at_end() {
            return None;
        }
        Some(self.value.remove(self.cursor_pos))
    }

    /// Moves the caret by `offset` chars, clamped to the text
    pub fn move_cursor(&mut self, offset: i32) {
        let steps = offset.unsigned_abs() as usize;
        let mut pos = self.cursor_pos;
        for _ in 0..steps {
            pos = if offset < 0 {
                self.value.floor_char_boundary(pos.saturating_sub(1))
            } else {
                self.value.ceil_char_boundary(pos + 1)
            };
        }
        self.cursor_pos = pos.min(self.value.len());
    }

    /// Moves the caret before the first char
    pub fn move_to_start(&mut self) {
        self.cursor_pos = 0;
    }

    /// Moves the caret after the last char
    pub fn move_to_end(&mut self) {
        self.cursor_pos = self.value.len();
    }

    /// Whether the caret is at the start
    pub fn at_start(&self) -> bool {
        self.cursor_pos == 0
    }

    /// Whether the caret is at the end
    pub fn at_end(&self) -> bool {
        self.cursor_pos >= self.value.len()
    }

    /// Deletes from the caret to the end (ctrl-k)
    pub fn kill_line(&mut self) -> String {
        self.value.split_off(self.cursor_pos)
    }

    /// Deletes from the start to the caret (ctrl-u)
    pub fn unix_line_discard(&mut self) -> String {
        let deleted: String = self.value.drain(..self.cursor_pos).collect();
        self.cursor_pos = 0;
        deleted
    }

    /// Deletes back over whitespace, then back to the previous whitespace (ctrl-w)
    pub fn unix_word_rubout(&mut self) -> String {
        let head = &self.value[..self.cursor_pos];
        let trimmed = head.trim_end();
        let pos = trimmed.rfind(char::is_whitespace).map_or(0, |i| {
            // skip the whitespace char itself
            i + trimmed[i..].chars().next().map_or(0, char::len_utf8)
        });

        let deleted: String = self.value.drain(pos..self.cursor_pos).collect();
        self.cursor_pos = pos;
        deleted
    }

    /// Replaces the whole text, keeping at most `capacity` bytes, and puts the caret at the end
    pub fn set(&mut self, text: &str) {
        let end = text.floor_char_boundary(self.capacity.min(text.len()));
        self.value.clear();
        self.value.push_str(&text[..end]);
        self.move_to_end();
    }

    /// The current text
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Byte offset of the caret
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Maximum length of the text, in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Display width of the text before the caret
    pub fn cursor_width(&self) -> usize {
        display_width(&self.value[..self.cursor_pos]) as usize
    }
}

impl Deref for Input {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
