//! In-memory text documents with editor offset addressing

use lsp_types::{Position, Range, TextDocumentContentChangeEvent};

/// Snapshot of an open document.
///
/// Offsets are counted in UTF-16 code units, matching how the editor host
/// addresses characters. Positions outside the document are clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    version: i32,
    text: String,
    /// UTF-16 offset at which each line begins
    line_starts: Vec<u32>,
}

impl TextDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text,
            line_starts,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn len_utf16(&self) -> u32 {
        self.text.encode_utf16().count() as u32
    }

    /// Offset of a position, clamped to the document bounds.
    ///
    /// A character past the end of its line resolves to the end of that line
    /// (before the line break); a line past the last line resolves to the end
    /// of the document.
    pub fn offset_at(&self, position: Position) -> u32 {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.len_utf16();
        }
        let line_start = self.line_starts[line];
        let next_line_start = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or_else(|| self.len_utf16());
        let line_end = self.trim_line_break(line_start, next_line_start);
        line_start.saturating_add(position.character).min(line_end)
    }

    /// Position of an offset, clamped to the document bounds
    pub fn position_at(&self, offset: u32) -> Position {
        let offset = offset.min(self.len_utf16());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line as u32, offset - self.line_starts[line])
    }

    /// Apply content changes in order and bump the version
    pub fn apply_changes(&mut self, changes: Vec<TextDocumentContentChangeEvent>, version: i32) {
        for change in changes {
            match change.range {
                Some(range) => self.replace_range(range, &change.text),
                None => self.text = change.text,
            }
            self.line_starts = compute_line_starts(&self.text);
        }
        self.version = version;
    }

    fn replace_range(&mut self, range: Range, replacement: &str) {
        let start = self.byte_index(self.offset_at(range.start));
        let end = self.byte_index(self.offset_at(range.end));
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.text.replace_range(start..end, replacement);
    }

    /// Byte index into `text` of a UTF-16 offset
    fn byte_index(&self, offset: u32) -> usize {
        let mut units = 0u32;
        for (index, ch) in self.text.char_indices() {
            if units >= offset {
                return index;
            }
            units += ch.len_utf16() as u32;
        }
        self.text.len()
    }

    fn trim_line_break(&self, line_start: u32, next_line_start: u32) -> u32 {
        let mut end = next_line_start;
        let bytes_start = self.byte_index(line_start);
        let bytes_end = self.byte_index(next_line_start);
        let line = &self.text[bytes_start..bytes_end];
        if line.ends_with("\r\n") {
            end -= 2;
        } else if line.ends_with('\n') || line.ends_with('\r') {
            end -= 1;
        }
        end
    }
}

fn compute_line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0];
    let mut offset = 0u32;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        offset += ch.len_utf16() as u32;
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    offset += 1;
                }
                starts.push(offset);
            }
            '\n' => starts.push(offset),
            _ => {}
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> TextDocument {
        TextDocument::new("file:///ws/src/main.rs", "rust", 1, text)
    }

    #[test]
    fn test_offset_at_counts_lines() {
        let d = doc("fn main() {\n    let x = 1;\n}\n");
        assert_eq!(d.offset_at(Position::new(0, 0)), 0);
        assert_eq!(d.offset_at(Position::new(1, 4)), 16);
        assert_eq!(d.offset_at(Position::new(2, 1)), 28);
    }

    #[test]
    fn test_offset_at_clamps_out_of_range_positions() {
        let d = doc("ab\ncd");
        assert_eq!(d.offset_at(Position::new(0, 99)), 2);
        assert_eq!(d.offset_at(Position::new(7, 0)), 5);
    }

    #[test]
    fn test_offset_at_clamps_maximal_character() {
        let d = doc("fn main() {\n    let x = 1;\n}\n");
        assert_eq!(d.offset_at(Position::new(1, u32::MAX)), 26);
    }

    #[test]
    fn test_offset_at_uses_utf16_code_units() {
        let d = doc("let s = \"🦀\";\nx");
        // the crab is two UTF-16 code units
        assert_eq!(d.offset_at(Position::new(1, 0)), 14);
    }

    #[test]
    fn test_crlf_line_endings() {
        let d = doc("ab\r\ncd");
        assert_eq!(d.offset_at(Position::new(1, 1)), 5);
        assert_eq!(d.offset_at(Position::new(0, 5)), 2);
    }

    #[test]
    fn test_position_at_inverts_offset_at() {
        let d = doc("fn main() {\n    let x = 1;\n}\n");
        assert_eq!(d.position_at(16), Position::new(1, 4));
        assert_eq!(d.position_at(1000), Position::new(3, 0));
    }

    #[test]
    fn test_apply_incremental_and_full_changes() {
        let mut d = doc("hello world");
        d.apply_changes(
            vec![TextDocumentContentChangeEvent {
                range: Some(Range::new(Position::new(0, 6), Position::new(0, 11))),
                range_length: None,
                text: "rust".to_string(),
            }],
            2,
        );
        assert_eq!(d.text(), "hello rust");
        assert_eq!(d.version(), 2);

        d.apply_changes(
            vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "a\nb".to_string(),
            }],
            3,
        );
        assert_eq!(d.line_count(), 2);
        assert_eq!(d.offset_at(Position::new(1, 1)), 3);
    }
}
