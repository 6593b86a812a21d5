//! Selection offsets passed to the refactoring tool

use crate::document::TextDocument;
use lsp_types::Range;
use std::fmt;

/// Pair of document offsets identifying a selection.
///
/// `(-1, -1)` marks "no selection". Any collapsed selection is reported as
/// `(0, 0)`, so a cursor at the start of the document and a cursor anywhere
/// else look the same: use [`ByteRange::is_empty`], not value comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: i64,
    pub end: i64,
}

impl ByteRange {
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub const fn null() -> Self {
        Self::new(-1, -1)
    }

    pub const fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Convert an editor range into document offsets
    pub fn from_range(range: Option<&Range>, document: Option<&TextDocument>) -> Self {
        let (Some(range), Some(document)) = (range, document) else {
            return Self::null();
        };
        if range.start == range.end {
            return Self::empty();
        }
        Self::new(
            i64::from(document.offset_at(range.start)),
            i64::from(document.offset_at(range.end)),
        )
    }

    pub fn is_range(&self) -> bool {
        self.start >= 0 && self.end >= 0
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `<start>:<end>`, as the tool expects its selection argument
    pub fn to_argument_string(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
