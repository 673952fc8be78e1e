//! Fixed-size character chunking.
//!
//! Splits text into consecutive slices of at most `size` characters, without
//! overlap. The iterator is lazy, always terminates and can be restarted by
//! cloning it before consumption.

use crate::error::CorpusError;

/// Iterator over fixed-size character slices of a text.
///
/// Slices are cut on `char` boundaries, so multi-byte characters are never
/// split. An empty text yields exactly one empty slice, which keeps the rule
/// that every document owns at least one chunk.
///
/// # Examples
///
/// ```
/// use docrank_core::corpus::CharChunks;
///
/// let chunks: Vec<&str> = CharChunks::new("abcdefg", 3).unwrap().collect();
/// assert_eq!(chunks, ["abc", "def", "g"]);
///
/// let empty: Vec<&str> = CharChunks::new("", 3).unwrap().collect();
/// assert_eq!(empty, [""]);
/// ```
#[derive(Debug, Clone)]
pub struct CharChunks<'a> {
    rest: &'a str,
    size: usize,
    emitted_any: bool,
}

impl<'a> CharChunks<'a> {
    /// Creates a chunk iterator over `text`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::InvalidConfig` if `size` is zero.
    pub fn new(text: &'a str, size: usize) -> Result<Self, CorpusError> {
        if size == 0 {
            return Err(CorpusError::InvalidConfig(
                "chunk size must be >= 1 character".into(),
            ));
        }
        Ok(Self {
            rest: text,
            size,
            emitted_any: false,
        })
    }

    /// Number of chunks this iterator yields in total, counted from the start.
    pub fn chunk_count(text: &str, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        text.chars().count().div_ceil(size).max(1)
    }
}

impl<'a> Iterator for CharChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            if self.emitted_any {
                return None;
            }
            self.emitted_any = true;
            return Some("");
        }

        let split_at = self
            .rest
            .char_indices()
            .nth(self.size)
            .map(|(idx, _)| idx)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(split_at);
        self.rest = rest;
        self.emitted_any = true;
        Some(chunk)
    }
}

impl std::iter::FusedIterator for CharChunks<'_> {}
