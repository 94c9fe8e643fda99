//! Segment module - bounded-size blocks of source text

use serde::{Deserialize, Serialize};

/// An ordered, immutable block of source text
///
/// Segments are produced once by a [`Chunker`](crate::traits::Chunker) and
/// consumed read-only by every discovery and extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Position of this segment within the source text (0-based)
    pub index: usize,

    /// The segment's text
    pub text: String,
}

impl Segment {
    /// Create a new segment
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Length of the segment text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Join the text of several segments with a separator
    pub fn join(segments: &[Segment], separator: &str) -> String {
        segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_preserves_order() {
        let segments = vec![Segment::new(0, "alpha"), Segment::new(1, "beta")];
        assert_eq!(Segment::join(&segments, "\n"), "alpha\nbeta");
    }

    #[test]
    fn test_char_len_counts_characters_not_bytes() {
        let segment = Segment::new(0, "héllo");
        assert_eq!(segment.char_len(), 5);
    }
}
