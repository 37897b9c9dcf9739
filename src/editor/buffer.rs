use ropey::Rope;

/// Width of one indent unit inserted by the Tab key
pub const INDENT_WIDTH: usize = 4;

/// Result of an indent operation: the new content and where the caret lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indented {
    pub content: String,
    pub caret: usize,
}

/// A text buffer backed by a rope data structure.
///
/// All offsets are character indices, never byte offsets. Offsets past the
/// end of the text are a caller bug and panic.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    /// The text content
    text: Rope,
    /// Monotonic version for change tracking
    version: u64,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `content`
    pub fn from_text(content: &str) -> Self {
        Self {
            text: Rope::from_str(content),
            version: 0,
        }
    }

    /// Get the current version of the buffer
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the full content of the buffer as a string
    pub fn content(&self) -> String {
        self.text.to_string()
    }

    /// Get total character count
    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.text.len_chars() == 0
    }

    /// Insert `text` at a character offset
    pub fn insert_at(&mut self, offset: usize, text: &str) {
        let len = self.text.len_chars();
        assert!(offset <= len, "insert offset {} out of range (len {})", offset, len);
        if text.is_empty() {
            return;
        }
        self.text.insert(offset, text);
        self.version = self.version.wrapping_add(1);
    }

    /// Replace the characters in `start..end` with `text`
    pub fn splice(&mut self, start: usize, end: usize, text: &str) {
        let len = self.text.len_chars();
        assert!(
            start <= end && end <= len,
            "splice range {}..{} out of range (len {})",
            start,
            end,
            len
        );
        if start < end {
            self.text.remove(start..end);
        }
        if !text.is_empty() {
            self.text.insert(start, text);
        }
        self.version = self.version.wrapping_add(1);
    }

    /// Replace the selection with `width` spaces and return the new caret.
    /// A reversed selection (anchor after head) is normalised first.
    pub fn indent(&mut self, selection_start: usize, selection_end: usize, width: usize) -> usize {
        let (start, end) = if selection_start <= selection_end {
            (selection_start, selection_end)
        } else {
            (selection_end, selection_start)
        };
        self.splice(start, end, &" ".repeat(width));
        start + width
    }

    /// Zero-based (line, column) of a character offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.text.char_to_line(offset);
        (line, offset - self.text.line_to_char(line))
    }

    /// Get total number of lines
    pub fn len_lines(&self) -> usize {
        self.text.len_lines()
    }
}

impl From<&str> for Buffer {
    fn from(content: &str) -> Self {
        Self::from_text(content)
    }
}

/// Insert `text` into `content` at a character offset
pub fn insert_at(content: &str, offset: usize, text: &str) -> String {
    let mut buffer = Buffer::from_text(content);
    buffer.insert_at(offset, text);
    buffer.content()
}

/// Replace the characters in `start..end` of `content` with `text`
pub fn splice(content: &str, start: usize, end: usize, text: &str) -> String {
    let mut buffer = Buffer::from_text(content);
    buffer.splice(start, end, text);
    buffer.content()
}

/// Tab-key behaviour: the selection becomes one indent unit
pub fn indent(content: &str, selection_start: usize, selection_end: usize) -> Indented {
    indent_with_width(content, selection_start, selection_end, INDENT_WIDTH)
}

/// Same as [`indent`] with a custom indent width
pub fn indent_with_width(
    content: &str,
    selection_start: usize,
    selection_end: usize,
    width: usize,
) -> Indented {
    let mut buffer = Buffer::from_text(content);
    let caret = buffer.indent(selection_start, selection_end, width);
    Indented {
        content: buffer.content(),
        caret,
    }
}
