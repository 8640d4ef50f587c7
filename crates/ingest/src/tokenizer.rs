//! Token length estimation.
//!
//! The chunker and orchestrator only ever ask "how long is this text?", so
//! the real model tokenizer stays an external capability behind
//! [`TokenCounter`].

/// Estimates the length of a text in model-countable tokens.
///
/// Implementations must be monotone over prefixes: a prefix never counts
/// more tokens than the full text.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Approximate token count via whitespace splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Sub-word estimate: every word costs `ceil(chars / chars_per_token)`.
///
/// Closer to BPE tokenizers than word counting for long technical terms.
#[derive(Debug, Clone, Copy)]
pub struct ApproxBpeTokenCounter {
    pub chars_per_token: usize,
}

impl Default for ApproxBpeTokenCounter {
    fn default() -> Self {
        Self { chars_per_token: 4 }
    }
}

impl TokenCounter for ApproxBpeTokenCounter {
    fn count(&self, text: &str) -> usize {
        let per = self.chars_per_token.max(1);
        text.split_whitespace()
            .map(|w| w.chars().count().div_ceil(per))
            .sum()
    }
}
