//! Chunk output type.

/// A contiguous slice of the document sized to fit the input budget.
///
/// `start..end` is the range this chunk *covers*; consecutive chunks cover
/// the document exactly once. `content` additionally carries any overlap
/// seeded from the previous chunk and spans `overlap_start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based index in document order.
    pub index: usize,
    /// Byte offset where the covered range begins.
    pub start: usize,
    /// Byte offset one past the covered range.
    pub end: usize,
    /// Byte offset where `content` begins (`<= start`).
    pub overlap_start: usize,
    /// Text sent to the engine: overlap followed by the covered range.
    pub content: String,
    /// Estimated token length of `content`.
    pub token_count: usize,
}

impl Chunk {
    /// The covered (non-overlapping) slice of `document`.
    pub fn covered<'d>(&self, document: &'d str) -> &'d str {
        &document[self.start..self.end]
    }

    /// True when the chunk carries context from its predecessor.
    pub fn has_overlap(&self) -> bool {
        self.overlap_start < self.start
    }
}
