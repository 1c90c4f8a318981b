//! Line and column tracking across text chunks

use crate::token::SourceMeta;
use compact_str::CompactString;

/// Running line/column position of a character-mode stream.
///
/// `\n`, `\r\n` and a lone `\r` each end a line, also when a `\r\n` pair is
/// split across two chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line number
    pub line: u32,
    /// Zero-based column (in UTF-8 bytes)
    pub column: u32,
    after_cr: bool,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line: 0,
            column: 0,
            after_cr: false,
        }
    }

    /// The current position as source metadata
    #[must_use]
    pub fn meta(&self, file: Option<&CompactString>) -> SourceMeta {
        SourceMeta::new(file.cloned(), self.line, self.column)
    }

    /// Move past `text`.
    pub fn advance(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' if self.after_cr => self.after_cr = false,
                '\n' => self.newline(),
                '\r' => {
                    self.newline();
                    self.after_cr = true;
                }
                _ => {
                    self.after_cr = false;
                    let width = u32::try_from(c.len_utf8()).unwrap_or(4);
                    self.column = self.column.saturating_add(width);
                }
            }
        }
    }

    fn newline(&mut self) {
        self.line = self.line.saturating_add(1);
        self.column = 0;
        self.after_cr = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32, column: u32) -> SourceMeta {
        SourceMeta::new(None, line, column)
    }

    #[test]
    fn test_cursor_columns_are_bytes() {
        let mut cursor = Cursor::new();
        cursor.advance("héllo");
        assert_eq!(cursor.meta(None), at(0, 6));
    }

    #[test]
    fn test_cursor_line_endings() {
        let mut cursor = Cursor::new();
        cursor.advance("a\nb\r\nc\rd");
        assert_eq!(cursor.meta(None), at(3, 1));
    }

    #[test]
    fn test_cursor_crlf_split_across_chunks() {
        let mut cursor = Cursor::new();
        cursor.advance("line 1\r");
        cursor.advance("\nline 2");
        assert_eq!(cursor.meta(None), at(1, 6));
    }

    #[test]
    fn test_cursor_meta_carries_file() {
        let file = CompactString::from("notes.md");
        let cursor = Cursor::new();
        assert_eq!(cursor.meta(Some(&file)).file.as_deref(), Some("notes.md"));
    }
}
