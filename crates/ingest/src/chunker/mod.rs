//! Budget-bounded document chunking.
//!
//! Splits a document into a lazy, restartable sequence of chunks whose
//! estimated token length never exceeds the engine's input budget. Units are
//! taken hierarchically (paragraph, sentence, word, then a forced character
//! split) and packed greedily; adjacent chunks may share a trailing overlap.

mod iter;
mod types;
mod units;

pub use iter::{chunk, ChunkIter};
pub use types::Chunk;
pub use units::{paragraph_end, sentence_ranges};
