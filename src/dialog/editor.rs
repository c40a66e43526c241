//! Single-line inline editor used for rename and clone.

/// Text buffer with a char-based cursor.
///
/// When `all_selected` is set the next insertion replaces the whole text,
/// matching how a freshly opened editor behaves.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
    all_selected: bool,
    echo: Option<String>,
}

impl LineEditor {
    /// Open an editor pre-filled with `text`, fully selected
    pub fn open(text: &str) -> Self {
        Self {
            buffer: text.to_string(),
            cursor: text.chars().count(),
            all_selected: true,
            echo: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn insert(&mut self, c: char) {
        if self.all_selected {
            self.clear();
        }
        let byte_pos = self.byte_offset();
        self.buffer.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        // Line breaks are not part of a session name
        for c in s.chars().filter(|c| !c.is_control()) {
            self.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.all_selected {
            self.clear();
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = self.byte_offset();
            self.buffer.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.all_selected {
            self.clear();
            return;
        }
        let byte_pos = self.byte_offset();
        if byte_pos < self.buffer.len() {
            self.buffer.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.all_selected = false;
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.all_selected = false;
        let char_count = self.buffer.chars().count();
        if self.cursor < char_count {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.all_selected = false;
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.all_selected = false;
        self.cursor = self.buffer.chars().count();
    }

    pub fn select_all(&mut self) {
        self.all_selected = true;
        self.cursor = self.buffer.chars().count();
    }

    /// Replace the text programmatically.
    ///
    /// Like a toolkit line edit, a programmatic change fires one extra
    /// commit carrying the new text; it is held until `take_echo`.
    pub fn replace_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = text.chars().count();
        self.all_selected = false;
        self.echo = Some(self.buffer.clone());
    }

    /// Take the pending programmatic commit, if any
    pub fn take_echo(&mut self) -> Option<String> {
        self.echo.take()
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.all_selected = false;
    }

    /// Convert char-based cursor position to byte offset.
    fn byte_offset(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}
