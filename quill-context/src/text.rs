//! Utilities for splitting raw document text into retrieval-sized chunks.
//!
//! The splitter feeds a RAG (Retrieval Augmented Generation) pipeline: a
//! document is cut into bounded, slightly overlapping segments, each segment
//! is embedded, and a query retrieves the nearest segments as grounding
//! context for a language model.
//!
//! Splitting respects natural structure before resorting to anything blunt:
//!
//! 1. Paragraphs (blank-line boundaries) are greedily packed into chunks of
//!    at most `chunk_size` characters, with the last `overlap` words of each
//!    finished chunk carried into the next one so that context is not lost at
//!    a boundary.
//! 2. Any chunk that still exceeds `chunk_size * 1.5` (a single huge
//!    paragraph, say) is re-split at sentence boundaries and re-packed.
//!
//! A chunk with no sentence boundaries at all cannot be reduced further and
//! is passed through oversized rather than truncated.
//!
//! # Usage
//!
//! ```
//! use quill_context::text::TextSplitter;
//!
//! let splitter = TextSplitter::new(500, 50);
//! let chunks = splitter.split("First paragraph.\n\nSecond paragraph.");
//!
//! assert!(!chunks.is_empty());
//! for chunk in &chunks {
//!     println!("chunk {}: {:?}", chunk.sequence, chunk.text);
//! }
//! ```
use regex::Regex;
use serde::Serialize;

/// Pattern marking the end of a sentence: terminal punctuation followed by
/// whitespace. The punctuation stays with its sentence; the whitespace is
/// consumed by the split.
const SENTENCE_END_PATTERN: &str = r"[.!?]\s+";

/// A single segment of a split document.
///
/// Chunks are immutable once produced and keep their 0-based position within
/// the sequence returned by [`TextSplitter::split`], so downstream indexes can
/// associate an embedding with a chunk purely by position.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    /// The position of this chunk within the split output (0-indexed).
    pub sequence: usize,
    /// The chunk text, trimmed of surrounding whitespace. Never empty.
    pub text: String,
}

/// Splits document text into bounded, overlapping chunks.
///
/// `chunk_size` is the soft target in characters: chunks may run past it when
/// a single paragraph or sentence does, but the repair pass keeps every
/// divisible chunk at or below `chunk_size * 1.5`. `overlap` is the number of
/// words carried from the tail of one chunk into the head of the next.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
    sentence_end: Regex,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(500, 50)
    }
}

impl TextSplitter {
    /// Creates a splitter with the given target chunk size (characters, > 0)
    /// and word overlap (≥ 0).
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        TextSplitter {
            chunk_size,
            overlap,
            sentence_end: Regex::new(SENTENCE_END_PATTERN).expect("sentence pattern is valid"),
        }
    }

    /// The configured target chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The configured overlap in words.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Splits `text` into an ordered sequence of non-empty chunks.
    ///
    /// Input that is empty (or whitespace-only) produces an empty sequence;
    /// callers that require a non-empty corpus must treat that as their own
    /// error condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_context::text::TextSplitter;
    ///
    /// // Two paragraphs that together exceed the chunk size split in two,
    /// // and the overlap carries the tail of the first into the second.
    /// let splitter = TextSplitter::new(40, 2);
    /// let chunks = splitter.split("alpha beta gamma delta epsilon zeta\n\neta theta iota kappa");
    /// assert_eq!(chunks.len(), 2);
    /// assert!(chunks[1].text.starts_with("epsilon zeta"));
    /// ```
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let packed = self.pack_paragraphs(text);
        let repaired = self.repair_oversized(packed);

        repaired
            .into_iter()
            .enumerate()
            .map(|(sequence, text)| Chunk { sequence, text })
            .collect()
    }

    /// Greedily accumulates paragraphs into chunks of roughly `chunk_size`
    /// characters, seeding each new chunk with the overlap carry from the
    /// previous one.
    fn pack_paragraphs(&self, text: &str) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for paragraph in text.split("\n\n") {
            if buffer.len() + paragraph.len() > self.chunk_size && !buffer.is_empty() {
                let closed = std::mem::take(&mut buffer);
                push_trimmed(&mut chunks, &closed);

                if self.overlap > 0 {
                    buffer = format!("{}\n\n{}", self.overlap_carry(&closed), paragraph);
                } else {
                    buffer = paragraph.to_string();
                }
            } else {
                if !buffer.is_empty() {
                    buffer.push_str("\n\n");
                }
                buffer.push_str(paragraph);
            }
        }

        push_trimmed(&mut chunks, &buffer);
        chunks
    }

    /// The last `overlap` words of `closed`, joined by single spaces. A chunk
    /// with no more than `overlap` words is carried whole, original
    /// whitespace included.
    fn overlap_carry(&self, closed: &str) -> String {
        let words: Vec<&str> = closed.split_whitespace().collect();
        if words.len() > self.overlap {
            words[words.len() - self.overlap..].join(" ")
        } else {
            closed.to_string()
        }
    }

    /// Re-splits any chunk longer than `chunk_size * 1.5` at sentence
    /// boundaries, re-packing greedily without overlap carry. Chunks at or
    /// below the threshold pass through unchanged.
    fn repair_oversized(&self, chunks: Vec<String>) -> Vec<String> {
        let mut repaired = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            // threshold: len > chunk_size * 1.5, kept in integer arithmetic
            if chunk.len() * 2 <= self.chunk_size * 3 {
                repaired.push(chunk);
                continue;
            }

            let mut buffer = String::new();
            for sentence in self.split_sentences(&chunk) {
                if buffer.len() + sentence.len() > self.chunk_size && !buffer.is_empty() {
                    push_trimmed(&mut repaired, &buffer);
                    buffer = sentence.to_string();
                } else {
                    if !buffer.is_empty() {
                        buffer.push(' ');
                    }
                    buffer.push_str(sentence);
                }
            }
            push_trimmed(&mut repaired, &buffer);
        }

        repaired
    }

    /// Splits `text` at sentence ends. The terminal punctuation character
    /// remains attached to its sentence; the trailing whitespace is dropped.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for mat in self.sentence_end.find_iter(text) {
            // The matched punctuation is a single ASCII byte.
            let end = mat.start() + 1;
            if end > start {
                sentences.push(&text[start..end]);
            }
            start = mat.end();
        }

        if start < text.len() {
            sentences.push(&text[start..]);
        }

        sentences
    }
}

fn push_trimmed(out: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input_produces_no_chunks() {
        let splitter = TextSplitter::new(500, 50);
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\n\t  ").is_empty());
    }

    #[test]
    fn test_short_document_is_a_single_chunk() {
        let splitter = TextSplitter::new(500, 50);
        let chunks = splitter.split("Just one small paragraph.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sequence, 0);
        assert_eq!(chunks[0].text, "Just one small paragraph.");
    }

    #[test]
    fn test_two_paragraphs_split_when_combined_size_exceeds_limit() {
        // 300 + 400 characters: together they exceed 500, so the size trigger
        // fires after the first paragraph.
        let para_a = "a".repeat(300);
        let para_b = "b".repeat(400);
        let doc = format!("{para_a}\n\n{para_b}");

        let splitter = TextSplitter::new(500, 0);
        let chunks = splitter.split(&doc);
        assert_eq!(texts(&chunks), vec![para_a.as_str(), para_b.as_str()]);

        // With a 1000-character budget both paragraphs fit in one chunk.
        let splitter = TextSplitter::new(1000, 0);
        let chunks = splitter.split(&doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, doc);
    }

    #[test]
    fn test_overlap_carries_tail_words_into_next_chunk() {
        let para_a = (0..20).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let para_b = "closing paragraph with fresh words";
        let doc = format!("{para_a}\n\n{para_b}");

        let overlap = 5;
        let splitter = TextSplitter::new(para_a.len(), overlap);
        let chunks = splitter.split(&doc);
        assert_eq!(chunks.len(), 2);

        let first_words: Vec<&str> = chunks[0].text.split_whitespace().collect();
        let carried: Vec<&str> = first_words[first_words.len() - overlap..].to_vec();
        let second_words: Vec<&str> = chunks[1].text.split_whitespace().collect();
        assert_eq!(&second_words[..overlap], carried.as_slice());
    }

    #[test]
    fn test_overlap_larger_than_chunk_carries_whole_chunk() {
        let doc = "one two three\n\nfour five six seven eight nine ten eleven";
        let splitter = TextSplitter::new(13, 50);
        let chunks = splitter.split(doc);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].text.starts_with("one two three"));
    }

    #[test]
    fn test_zero_overlap_has_no_carry() {
        let doc = "one two three\n\nfour five six";
        let splitter = TextSplitter::new(13, 0);
        let chunks = splitter.split(doc);

        assert_eq!(texts(&chunks), vec!["one two three", "four five six"]);
    }

    #[test]
    fn test_oversized_paragraph_is_repaired_at_sentence_boundaries() {
        // A single paragraph of many sentences, far over chunk_size * 1.5.
        let paragraph = (0..30)
            .map(|i| format!("Sentence number {i} fills out the line."))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(paragraph.len() > 150);

        let splitter = TextSplitter::new(100, 0);
        let chunks = splitter.split(&paragraph);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // Post-repair, every chunk of a divisible paragraph obeys the cap.
            assert!(
                chunk.text.len() * 2 <= 100 * 3,
                "chunk {} is {} chars",
                chunk.sequence,
                chunk.text.len()
            );
            assert!(!chunk.text.trim().is_empty());
        }
    }

    #[test]
    fn test_sentence_terminator_stays_with_its_sentence() {
        let paragraph = "Is this a question? Yes! And a statement. Trailing fragment";
        let splitter = TextSplitter::new(20, 0);
        let chunks = splitter.split(paragraph);

        assert!(texts(&chunks).contains(&"Is this a question?"));
        assert!(chunks.iter().any(|c| c.text.ends_with("fragment")));
    }

    #[test]
    fn test_undividable_oversized_chunk_passes_through() {
        // No sentence boundaries at all: the repair pass cannot reduce it.
        let blob = "x".repeat(400);
        let splitter = TextSplitter::new(100, 0);
        let chunks = splitter.split(&blob);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text.len(), 400);
    }

    #[test]
    fn test_sequences_are_contiguous_from_zero() {
        let doc = (0..10)
            .map(|i| format!("Paragraph {i} with a respectable amount of text in it."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let splitter = TextSplitter::new(120, 10);
        let chunks = splitter.split(&doc);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence, i);
        }
    }

    #[test]
    fn test_default_matches_app_defaults() {
        let splitter = TextSplitter::default();
        assert_eq!(splitter.chunk_size(), 500);
        assert_eq!(splitter.overlap(), 50);
    }
}
