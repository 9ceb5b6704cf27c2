//! Plain-text editing buffer backing the composer.
//!
//! The cursor is a byte offset into the text, always kept on a char
//! boundary. Horizontal movement and backspace operate on grapheme clusters
//! so combining sequences and emoji behave like single characters.

use unicode_segmentation::UnicodeSegmentation;

#[derive(Default)]
pub(crate) struct TextArea {
    text: String,
    cursor: usize,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Move the caret, clamping to the text and snapping back to the nearest
    /// char boundary at or before the requested offset.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.text.len());
        while cursor > 0 && !self.text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Replace the whole buffer and put the caret at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert at the caret and leave the caret after the inserted text.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Append at the end without disturbing the caret unless it was at the
    /// end already (streamed translation output uses this).
    pub fn append_str(&mut self, s: &str) {
        let at_end = self.cursor == self.text.len();
        self.text.push_str(s);
        if at_end {
            self.cursor = self.text.len();
        }
    }

    /// Replace `[start, end)` with `replacement`; caret lands after it.
    pub fn replace_range(&mut self, start: usize, end: usize, replacement: &str) {
        let start = start.min(self.text.len());
        let end = end.clamp(start, self.text.len());
        self.text.replace_range(start..end, replacement);
        self.cursor = start + replacement.len();
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(g) = self.text[self.cursor..].graphemes(true).next() {
            self.cursor += g.len();
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Delete the grapheme before the caret.
    pub fn delete_backward(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
            self.text.replace_range(idx..self.cursor, "");
            self.cursor = idx;
        }
    }

    /// Delete the grapheme after the caret.
    pub fn delete_forward(&mut self) {
        if let Some(g) = self.text[self.cursor..].graphemes(true).next() {
            let end = self.cursor + g.len();
            self.text.replace_range(self.cursor..end, "");
        }
    }
}
