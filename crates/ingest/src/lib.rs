//! Document ingestion and chunking.
//!
//! Turns extracted text into an immutable [`Document`] and splits it into
//! budget-bounded [`Chunk`]s for the summarization engine.

pub mod chunker;
pub mod document;
pub mod tokenizer;

pub use chunker::{chunk, paragraph_end, sentence_ranges, Chunk, ChunkIter};
pub use document::{Document, DocumentStats};
pub use tokenizer::{ApproxBpeTokenCounter, TokenCounter, WhitespaceTokenCounter};
