//! Greedy packing of units into chunks.

use std::iter::Peekable;

use studynotes_core::config::ChunkingConfig;
use studynotes_core::NotesError;

use tracing::debug;

use super::types::Chunk;
use super::units::Units;
use crate::tokenizer::TokenCounter;

/// Lazy iterator over the chunks of one document.
///
/// Cloning yields an independent iterator at the same position, so the
/// sequence can be restarted by calling [`chunk`] again or replayed from a
/// clone.
#[derive(Clone)]
pub struct ChunkIter<'a> {
    text: &'a str,
    counter: &'a dyn TokenCounter,
    max_tokens: usize,
    overlap_tokens: usize,
    units: Peekable<Units<'a>>,
    index: usize,
    cursor: usize,
    overlap_start: usize,
}

/// Split `text` into chunks of at most `config.max_input_tokens` tokens.
///
/// Fails with `ChunkingFailure` when the budget is zero or leaves no room
/// beside the requested overlap.
pub fn chunk<'a>(
    text: &'a str,
    config: &ChunkingConfig,
    counter: &'a dyn TokenCounter,
) -> Result<ChunkIter<'a>, NotesError> {
    if config.max_input_tokens == 0 {
        return Err(NotesError::ChunkingFailure(
            "max_input_tokens must be greater than zero".into(),
        ));
    }
    if config.overlap_tokens >= config.max_input_tokens {
        return Err(NotesError::ChunkingFailure(format!(
            "overlap_tokens ({}) must be smaller than max_input_tokens ({})",
            config.overlap_tokens, config.max_input_tokens
        )));
    }
    debug!(
        chars = text.len(),
        max_tokens = config.max_input_tokens,
        overlap_tokens = config.overlap_tokens,
        "chunking text"
    );
    Ok(ChunkIter {
        text,
        counter,
        max_tokens: config.max_input_tokens,
        overlap_tokens: config.overlap_tokens,
        units: Units::new(text, counter, config.max_input_tokens).peekable(),
        index: 0,
        cursor: 0,
        overlap_start: 0,
    })
}

impl ChunkIter<'_> {
    fn tokens_between(&self, from: usize, to: usize) -> usize {
        self.counter.count(&self.text[from..to])
    }

    /// Start of the trailing words of `start..end` that fit in the overlap
    /// budget. Returns `end` when nothing fits.
    fn overlap_seed(&self, start: usize, end: usize) -> usize {
        if self.overlap_tokens == 0 {
            return end;
        }
        let covered = &self.text[start..end];
        let mut prev_space = true;
        let word_starts: Vec<usize> = covered
            .char_indices()
            .filter_map(|(i, c)| {
                let is_start = !c.is_whitespace() && prev_space;
                prev_space = c.is_whitespace();
                is_start.then_some(start + i)
            })
            .collect();

        let mut seed = end;
        for &candidate in word_starts.iter().rev() {
            if self.tokens_between(candidate, end) > self.overlap_tokens {
                break;
            }
            seed = candidate;
        }
        seed
    }
}

impl Iterator for ChunkIter<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let first = self.units.next()?;
        let start = self.cursor;
        debug_assert_eq!(first.start, start, "units must tile the document");

        let mut seed = self.overlap_start.min(start);
        if seed < start && self.tokens_between(seed, first.end) > self.max_tokens {
            seed = start;
        }

        let mut end = first.end;
        while let Some(next_end) = self.units.peek().map(|unit| unit.end) {
            if self.tokens_between(seed, next_end) > self.max_tokens {
                break;
            }
            end = next_end;
            self.units.next();
        }

        let content = self.text[seed..end].to_string();
        let token_count = self.counter.count(&content);
        let chunk = Chunk {
            index: self.index,
            start,
            end,
            overlap_start: seed,
            content,
            token_count,
        };

        self.index += 1;
        self.cursor = end;
        self.overlap_start = self.overlap_seed(start, end);
        Some(chunk)
    }
}
