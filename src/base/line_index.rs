//! Byte offset to line/column conversion.

use text_size::{TextRange, TextSize};

use super::position::{Position, Span};

/// Converts a byte offset into a [`TextSize`], saturating at `u32::MAX`.
///
/// Offsets are 32-bit; text past 4 GiB is not addressable and every offset
/// beyond it maps to the last one.
pub fn text_offset(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::new(u32::MAX))
}

/// Line start offsets for one document, built once per parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(text_offset(offset + 1));
            }
        }
        Self {
            line_starts,
            len: text_offset(text.len()),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset into a position. Offsets past the end clamp to the end.
    ///
    /// Columns are byte columns.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = u32::from(offset - self.line_starts[line]) as usize;
        Position::new(line, column)
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span::new(self.position(range.start()), self.position(range.end()))
    }
}
