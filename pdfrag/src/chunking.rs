//! Document chunking.
//!
//! Text is cut into fixed-size, overlapping windows of characters. Window `i`
//! starts at character `i * (chunk_size - chunk_overlap)` and spans at most
//! `chunk_size` characters. Windows that are blank after trimming are dropped.

use crate::error::{RagError, Result};

/// A contiguous slice of the source text produced by a [`Chunker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWindow<'a> {
    /// Offset of the first character of the window, in characters.
    pub start: usize,
    /// The window's text, untrimmed.
    pub text: &'a str,
}

impl TextWindow<'_> {
    /// Length of the window in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A strategy for splitting document text into chunks.
///
/// Implementations must be pure: the same text always yields the same
/// windows, independent of earlier calls.
pub trait Chunker: Send + Sync {
    /// Split text into ordered windows.
    ///
    /// Returns an empty `Vec` for empty text. Every returned window has
    /// non-blank text.
    fn split<'a>(&self, text: &'a str) -> Vec<TextWindow<'a>>;
}

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// # Example
///
/// ```rust,ignore
/// use pdfrag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(500, 50)?;
/// let windows = chunker.split(&text);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk
    /// * `chunk_overlap`: number of overlapping characters between consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] unless `chunk_overlap < chunk_size`.
    /// A non-positive stride would never make progress through the text.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    /// Maximum number of characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive chunks, in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

impl Chunker for FixedSizeChunker {
    fn split<'a>(&self, text: &'a str) -> Vec<TextWindow<'a>> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every character, plus the end of the text, so that
        // character positions map onto valid slice boundaries.
        let boundaries: Vec<usize> =
            text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let char_count = boundaries.len() - 1;

        (0..char_count)
            .step_by(self.stride())
            .filter_map(|start| {
                let end = (start + self.chunk_size).min(char_count);
                let window = &text[boundaries[start]..boundaries[end]];
                (!window.trim().is_empty()).then_some(TextWindow { start, text: window })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_yields_overlapping_windows() {
        let text = "A".repeat(1200);
        let chunker = FixedSizeChunker::new(500, 50).unwrap();

        let windows = chunker.split(&text);

        let bounds: Vec<(usize, usize)> =
            windows.iter().map(|w| (w.start, w.start + w.char_len())).collect();
        assert_eq!(bounds, vec![(0, 500), (450, 950), (900, 1200)]);
        let lengths: Vec<usize> = windows.iter().map(TextWindow::char_len).collect();
        assert_eq!(lengths, vec![500, 500, 300]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let chunker = FixedSizeChunker::new(500, 50).unwrap();
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn short_text_is_a_single_window() {
        let chunker = FixedSizeChunker::new(500, 50).unwrap();
        let windows = chunker.split("  a short page  ");
        assert_eq!(windows, vec![TextWindow { start: 0, text: "  a short page  " }]);
    }

    #[test]
    fn blank_windows_are_dropped() {
        let chunker = FixedSizeChunker::new(10, 2).unwrap();
        let text = format!("0123456789{}", " ".repeat(30));

        let windows = chunker.split(&text);

        let texts: Vec<&str> = windows.iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["0123456789", "89        "]);
    }

    #[test]
    fn whitespace_only_text_yields_nothing() {
        let chunker = FixedSizeChunker::new(4, 1).unwrap();
        assert!(chunker.split(" \n\t \n   ").is_empty());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let chunker = FixedSizeChunker::new(3, 1).unwrap();
        let windows = chunker.split("ñandú€");

        let texts: Vec<&str> = windows.iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["ñan", "ndú", "ú€"]);
        assert_eq!(windows[2].start, 4);
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        assert!(matches!(FixedSizeChunker::new(50, 50), Err(RagError::ConfigError(_))));
        assert!(matches!(FixedSizeChunker::new(0, 0), Err(RagError::ConfigError(_))));
        assert!(FixedSizeChunker::new(50, 0).is_ok());
    }
}
