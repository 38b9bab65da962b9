//! Source locations.
//!
//! Every token and AST node carries a [`Location`]: a half-open byte range
//! into the buffer that was tokenized. Line and column are never stored;
//! callers that want them build a [`LineIndex`] over the same buffer.

use std::fmt;

/// Half-open byte range `start..end` into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl Location {
    /// Create a location. `start` must not exceed `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// An empty location at `offset`.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest location covering both `self` and `other`.
    #[must_use]
    pub fn cover(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice `source` at this location, or `None` if out of bounds or not on
    /// a character boundary.
    #[must_use]
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets in a buffer to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        // a leading byte-order mark is not a visible column
        let first = if source.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        let mut line_starts = vec![first];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Number of lines in the buffer (an empty buffer has one line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of `offset`. Offsets past the end clamp to the end of the
    /// buffer and offsets inside a leading byte-order mark clamp to line 1,
    /// column 1. Offsets inside a multi-byte character count that character
    /// as already passed.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.clamp(self.line_starts[0], self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source.as_bytes()[line_start..offset]
            .iter()
            .filter(|&&b| (b & 0xC0) != 0x80)
            .count()
            + 1;
        Position {
            line: line + 1,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_and_len() {
        let a = Location::new(2, 5);
        let b = Location::new(7, 9);
        assert_eq!(a.cover(&b), Location::new(2, 9));
        assert_eq!(b.cover(&a), Location::new(2, 9));
        assert_eq!(a.len(), 3);
        assert!(Location::point(4).is_empty());
    }

    #[test]
    fn equality_needs_both_bounds() {
        assert_eq!(Location::new(1, 3), Location::new(1, 3));
        assert_ne!(Location::new(1, 3), Location::new(1, 4));
        assert_ne!(Location::new(0, 3), Location::new(1, 3));
    }

    #[test]
    fn slice_source() {
        let src = "set x = 10";
        assert_eq!(Location::new(4, 5).slice(src), Some("x"));
        assert_eq!(Location::new(8, 99).slice(src), None);
    }

    #[test]
    fn positions() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(0), Position { line: 1, column: 1 });
        assert_eq!(index.position(2), Position { line: 1, column: 3 });
        assert_eq!(index.position(3), Position { line: 2, column: 1 });
        assert_eq!(index.position(6), Position { line: 3, column: 1 });
        assert_eq!(index.position(8), Position { line: 4, column: 2 });
        assert_eq!(index.position(100), Position { line: 4, column: 3 });
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("\"héllo\" x");
        // 'é' is two bytes
        assert_eq!(index.position(9), Position { line: 1, column: 9 });
    }

    #[test]
    fn byte_order_mark_is_not_a_column() {
        let index = LineIndex::new("\u{FEFF}ab\ncd");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.position(0), Position { line: 1, column: 1 });
        assert_eq!(index.position(3), Position { line: 1, column: 1 });
        assert_eq!(index.position(4), Position { line: 1, column: 2 });
        assert_eq!(index.position(6), Position { line: 2, column: 1 });
    }
}
