//! Source location tracking

use serde::{Deserialize, Serialize};

/// A byte range into the original source file.
///
/// Spans are produced by the external parser and carried through the
/// syntax tree unchanged; trees built by hand (e.g. in tests) use
/// `Span::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}
