//! Text chunking strategies for long transcripts

use crate::config::ChunkStrategy;
use reelgraph_domain::traits::Chunker;
use reelgraph_domain::Segment;

const RECURSIVE_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", " "];
const PARAGRAPH_SEPARATORS: &[&str] = &["\n\n"];
const SENTENCE_SEPARATORS: &[&str] = &[". ", "? ", "! "];

/// Chunks text according to the specified strategy
///
/// Sizes are measured in characters. Every segment is at most `max_size`
/// characters; a piece that no separator can shrink is cut at the limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextChunker {
    strategy: ChunkStrategy,
}

impl TextChunker {
    /// Create a new text chunker
    pub fn new(strategy: ChunkStrategy) -> Self {
        Self { strategy }
    }

    fn separators(&self) -> &'static [&'static str] {
        match self.strategy {
            ChunkStrategy::Recursive => RECURSIVE_SEPARATORS,
            ChunkStrategy::ByParagraph => PARAGRAPH_SEPARATORS,
            ChunkStrategy::BySentence => SENTENCE_SEPARATORS,
        }
    }

    /// Split `text` into pieces no longer than `max_size`, trying each
    /// separator in turn before falling back to a hard cut
    fn split_recursive(text: &str, max_size: usize, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= max_size {
            return vec![text.to_string()];
        }

        let Some((separator, rest)) = separators.split_first() else {
            return split_at_char_limit(text, max_size);
        };

        if !text.contains(separator) {
            return Self::split_recursive(text, max_size, rest);
        }

        let pieces: Vec<String> = text
            .split_inclusive(separator)
            .flat_map(|piece| Self::split_recursive(piece, max_size, rest))
            .collect();

        combine_until_limit(pieces, max_size)
    }
}

impl Chunker for TextChunker {
    fn split(&self, text: &str, max_size: usize) -> Vec<Segment> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        Self::split_recursive(text, max_size.max(1), self.separators())
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .enumerate()
            .map(|(index, chunk)| Segment::new(index, chunk))
            .collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Combine consecutive pieces while they fit within the limit
fn combine_until_limit(pieces: Vec<String>, max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = char_len(&piece);
        if current_len + piece_len > max_size && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(&piece);
        current_len += piece_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split text at character limit boundaries
fn split_at_char_limit(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_no_chunking_needed_for_small_text() {
        let chunker = TextChunker::default();
        let segments = chunker.split("Short text here.", 100);
        assert_eq!(texts(&segments), vec!["Short text here."]);
        assert_eq!(segments[0].index, 0);
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        let chunker = TextChunker::default();
        assert!(chunker.split("", 100).is_empty());
        assert!(chunker.split("  \n\n ", 100).is_empty());
    }

    #[test]
    fn test_chunk_by_paragraph() {
        let chunker = TextChunker::new(ChunkStrategy::ByParagraph);
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.";
        let segments = chunker.split(text, 50);

        assert_eq!(
            texts(&segments),
            vec![
                "First paragraph here.\n\nSecond paragraph here.",
                "Third paragraph here."
            ]
        );
    }

    #[test]
    fn test_chunk_by_sentence() {
        let chunker = TextChunker::new(ChunkStrategy::BySentence);
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let segments = chunker.split(text, 25);

        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert!(segment.char_len() <= 25);
        }
    }

    #[test]
    fn test_recursive_splits_single_line_transcript_on_words() {
        let chunker = TextChunker::default();
        let text = "so today we will talk about gradient descent and why it works";
        let segments = chunker.split(text, 20);

        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(segment.char_len() <= 20);
            // Words are never cut in half
            for word in segment.text.split(' ') {
                assert!(text.split(' ').any(|w| w == word), "cut word: {}", word);
            }
        }
    }

    #[test]
    fn test_indices_are_consecutive() {
        let chunker = TextChunker::default();
        let text = "a b c d e f g h i j k l m n o p";
        let segments = chunker.split(text, 4);
        for (expected, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, expected);
        }
    }

    #[test]
    fn test_very_long_word_is_cut() {
        let chunker = TextChunker::default();
        let text = "a".repeat(100);
        let segments = chunker.split(&text, 20);

        assert_eq!(segments.len(), 5);
        assert!(segments.iter().all(|s| s.char_len() == 20));
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundaries() {
        let chunker = TextChunker::default();
        let text = "é".repeat(30);
        let segments = chunker.split(&text, 7);

        assert_eq!(segments.iter().map(Segment::char_len).sum::<usize>(), 30);
    }

    #[test]
    fn test_no_text_is_lost() {
        let chunker = TextChunker::default();
        let text = "Alpha beta. Gamma delta!\nEpsilon zeta?\n\nEta theta iota kappa.";
        let segments = chunker.split(text, 15);

        let rejoined: String = segments.iter().map(|s| s.text.replace(char::is_whitespace, "")).collect();
        assert_eq!(rejoined, text.replace(char::is_whitespace, ""));
    }
}
