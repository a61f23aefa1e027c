use std::ops::Range;

use ropey::Rope;

use crate::error::EditError;

/// A half-open char range into a buffer.
///
/// Offsets count Unicode scalar values, not bytes. A selection is only
/// meaningful for the buffer it was captured from; after an edit it must be
/// recaptured or collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// Create a selection covering `start..end`.
    ///
    /// # Errors
    /// Returns [`EditError::InvertedSelection`] when `start > end`.
    pub const fn new(start: usize, end: usize) -> Result<Self, EditError> {
        if start > end {
            return Err(EditError::InvertedSelection { start, end });
        }
        Ok(Self { start, end })
    }

    /// An empty selection (a caret) at `at`.
    pub const fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of selected chars.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// The raw document text.
///
/// Backed by a rope so clones share structure. No method mutates in
/// place: edits return a fresh buffer and leave `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    rope: Rope,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the whole document.
    #[must_use]
    pub fn set_text(&self, text: &str) -> Self {
        Self::from_text(text)
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Capture a selection against this buffer.
    ///
    /// # Errors
    /// Rejects inverted ranges and ranges reaching past the end of the text.
    pub fn capture_selection(&self, start: usize, end: usize) -> Result<Selection, EditError> {
        let selection = Selection::new(start, end)?;
        self.check_bounds(selection)?;
        Ok(selection)
    }

    /// The selected text, or `None` if the selection does not fit this buffer.
    pub fn selected_text(&self, selection: Selection) -> Option<String> {
        self.rope
            .get_slice(selection.range())
            .map(|slice| slice.to_string())
    }

    /// Text before char offset `at` (clamped to the buffer).
    pub fn text_before(&self, at: usize) -> String {
        let at = at.min(self.len_chars());
        self.rope.slice(..at).to_string()
    }

    /// Text from char offset `at` to the end (clamped to the buffer).
    pub fn text_after(&self, at: usize) -> String {
        let at = at.min(self.len_chars());
        self.rope.slice(at..).to_string()
    }

    /// Return a new buffer with the selected range replaced by `replacement`.
    ///
    /// # Errors
    /// Returns [`EditError::SelectionOutOfBounds`] if the selection was
    /// captured from a longer buffer.
    pub fn splice(&self, selection: Selection, replacement: &str) -> Result<Self, EditError> {
        self.check_bounds(selection)?;
        let mut rope = self.rope.clone();
        rope.remove(selection.range());
        rope.insert(selection.start(), replacement);
        Ok(Self { rope })
    }

    fn check_bounds(&self, selection: Selection) -> Result<(), EditError> {
        let len = self.len_chars();
        if selection.end() > len {
            return Err(EditError::SelectionOutOfBounds {
                end: selection.end(),
                len,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.text(), "hello\nworld");
        assert_eq!(buf.to_string(), "hello\nworld");
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_len_counts_chars_not_bytes() {
        let buf = EditorBuffer::from_text("héllo");
        assert_eq!(buf.len_chars(), 5);
    }

    #[test]
    fn test_selection_rejects_inverted_range() {
        assert_eq!(
            Selection::new(4, 2),
            Err(EditError::InvertedSelection { start: 4, end: 2 })
        );
    }

    #[test]
    fn test_collapsed_selection_is_empty() {
        let sel = Selection::collapsed(3);
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
        assert_eq!(sel.range(), 3..3);
    }

    #[test]
    fn test_capture_selection_within_bounds() {
        let buf = EditorBuffer::from_text("Hello world");
        let sel = buf.capture_selection(6, 11).unwrap();
        assert_eq!(buf.selected_text(sel).as_deref(), Some("world"));
    }

    #[test]
    fn test_capture_selection_past_end_is_rejected() {
        let buf = EditorBuffer::from_text("abc");
        assert_eq!(
            buf.capture_selection(1, 4),
            Err(EditError::SelectionOutOfBounds { end: 4, len: 3 })
        );
    }

    #[test]
    fn test_selected_text_uses_char_offsets() {
        let buf = EditorBuffer::from_text("añb");
        let sel = buf.capture_selection(1, 2).unwrap();
        assert_eq!(buf.selected_text(sel).as_deref(), Some("ñ"));
    }

    #[test]
    fn test_splice_returns_new_buffer_and_keeps_original() {
        let buf = EditorBuffer::from_text("Hello world");
        let sel = buf.capture_selection(6, 11).unwrap();
        let edited = buf.splice(sel, "there").unwrap();
        assert_eq!(edited.text(), "Hello there");
        assert_eq!(buf.text(), "Hello world");
    }

    #[test]
    fn test_splice_with_empty_selection_inserts() {
        let buf = EditorBuffer::from_text("ab");
        let edited = buf.splice(Selection::collapsed(1), "-").unwrap();
        assert_eq!(edited.text(), "a-b");
    }

    #[test]
    fn test_splice_with_stale_selection_fails() {
        let long = EditorBuffer::from_text("a long buffer");
        let sel = long.capture_selection(2, 13).unwrap();
        let short = long.set_text("short");
        assert!(matches!(
            short.splice(sel, "x"),
            Err(EditError::SelectionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_text_before_and_after_clamp() {
        let buf = EditorBuffer::from_text("abcdef");
        assert_eq!(buf.text_before(2), "ab");
        assert_eq!(buf.text_after(4), "ef");
        assert_eq!(buf.text_before(99), "abcdef");
        assert_eq!(buf.text_after(99), "");
    }
}
