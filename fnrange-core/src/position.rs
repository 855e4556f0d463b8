//! Offset to line/column translation
//!
//! Lines and columns are zero-based. A line break is `\n`, `\r\n`, a lone `\r`,
//! U+2028 or U+2029. Columns count UTF-16 code units, matching what JavaScript
//! engines and devtools report.

use serde::{Deserialize, Serialize};

/// Zero-based line/column source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Precomputed line starts for repeated offset lookups in one source text
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset where each line begins; always starts with 0
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = text.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            match ch {
                '\r' => {
                    if let Some(&(next_idx, '\n')) = chars.peek() {
                        chars.next();
                        line_starts.push(next_idx + 1);
                    } else {
                        line_starts.push(idx + 1);
                    }
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push(idx + ch.len_utf8()),
                _ => {}
            }
        }

        LineIndex { text, line_starts }
    }

    /// Number of lines in the text (an empty text has one line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Translate a byte offset into a line/column position
    ///
    /// `offset == text.len()` yields the end-of-file position. Offsets past the
    /// end are a caller bug and are clamped to the end of the text.
    pub fn position_at(&self, offset: usize) -> Position {
        debug_assert!(
            offset <= self.text.len(),
            "offset {} out of range for text of length {}",
            offset,
            self.text.len()
        );
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column: usize = self.text[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();

        Position::new(line as u32, column as u32)
    }
}

/// Translate a single byte offset without keeping the index around
pub fn translate(offset: usize, text: &str) -> Position {
    LineIndex::new(text).position_at(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_text() {
        assert_eq!(translate(0, "abc"), Position::new(0, 0));
        assert_eq!(translate(0, ""), Position::new(0, 0));
    }

    #[test]
    fn test_end_of_file_offset() {
        assert_eq!(translate(3, "abc"), Position::new(0, 3));
        assert_eq!(translate(4, "ab\nc"), Position::new(1, 1));
        assert_eq!(translate(3, "ab\n"), Position::new(1, 0));
    }

    #[test]
    fn test_lf_lines() {
        let text = "one\ntwo\nthree";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position_at(3), Position::new(0, 3));
        assert_eq!(index.position_at(4), Position::new(1, 0));
        assert_eq!(index.position_at(6), Position::new(1, 2));
        assert_eq!(index.position_at(8), Position::new(2, 0));
        assert_eq!(index.position_at(13), Position::new(2, 5));
    }

    #[test]
    fn test_crlf_counts_as_one_break() {
        let text = "a\r\nb";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.position_at(1), Position::new(0, 1));
        assert_eq!(index.position_at(2), Position::new(0, 2));
        assert_eq!(index.position_at(3), Position::new(1, 0));
    }

    #[test]
    fn test_lone_cr_and_unicode_separators() {
        assert_eq!(translate(2, "a\rb"), Position::new(1, 0));
        let text = "a\u{2028}b\u{2029}c";
        // U+2028 and U+2029 are three bytes each in UTF-8
        assert_eq!(translate(4, text), Position::new(1, 0));
        assert_eq!(translate(8, text), Position::new(2, 0));
    }

    #[test]
    fn test_columns_are_utf16_units() {
        // 'é' is 2 bytes / 1 unit, '😀' is 4 bytes / 2 units
        let text = "é😀x";
        assert_eq!(translate(2, text), Position::new(0, 1));
        assert_eq!(translate(6, text), Position::new(0, 3));
        assert_eq!(translate(7, text), Position::new(0, 4));
    }

    #[test]
    fn test_offset_inside_char_rounds_down() {
        let text = "é";
        assert_eq!(translate(1, text), Position::new(0, 0));
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::new(4, 4), Position::new(4, 4));
    }
}
