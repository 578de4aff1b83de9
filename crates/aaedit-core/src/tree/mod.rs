//! Semantic tree model
//!
//! Plain-data snapshots of the profiles in one parse of a document. Every
//! value is stamped with the [`Generation`] of the parse that produced it,
//! and equality includes that stamp: a rule from an earlier parse never
//! equals a rule from the current one, even when the text is identical.
//! The document engine uses this to reject stale handles.

mod prefix;
mod profile;
mod rule;

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

pub use prefix::RulePrefix;
pub use profile::{Profile, build_profiles};
pub use rule::{CapabilityRule, FileRule, Rule, RuleHandle};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identity of one parse pass, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Allocate a tag no other parse has used
    pub fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Byte range `[start, end)` of a rule in the text of its generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleSpan {
    start: usize,
    end: usize,
}

impl RuleSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<rowan::TextRange> for RuleSpan {
    fn from(range: rowan::TextRange) -> Self {
        Self::new(range.start().into(), range.end().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_are_unique() {
        let a = Generation::next();
        let b = Generation::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_rule_span_from_text_range() {
        let range = rowan::TextRange::new(6.into(), 37.into());
        let span = RuleSpan::from(range);
        assert_eq!(span.range(), 6..37);
        assert_eq!(span.len(), 31);
        assert!(!span.is_empty());
    }
}
