//! Boundary detection and the lazy unit stream used by the packer.
//!
//! Every range produced here tiles its parent: separator whitespace stays
//! attached to the preceding unit, so concatenating units in order gives
//! back the original text byte for byte.

use std::collections::VecDeque;
use std::ops::Range;

use crate::tokenizer::TokenCounter;

/// Split granularity, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Paragraph,
    Sentence,
    Word,
}

/// Lazy stream of atomic units, each within `max_tokens` on its own.
///
/// Paragraphs are located one at a time; only a paragraph that exceeds the
/// budget is broken into sentences, then words, then characters.
#[derive(Clone)]
pub(crate) struct Units<'a> {
    text: &'a str,
    counter: &'a dyn TokenCounter,
    max_tokens: usize,
    pos: usize,
    pending: VecDeque<Range<usize>>,
}

impl<'a> Units<'a> {
    pub(crate) fn new(text: &'a str, counter: &'a dyn TokenCounter, max_tokens: usize) -> Self {
        Self {
            text,
            counter,
            max_tokens,
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    fn fits(&self, range: &Range<usize>) -> bool {
        self.counter.count(&self.text[range.clone()]) <= self.max_tokens
    }

    fn split_into(&mut self, range: Range<usize>, level: Level) {
        if self.fits(&range) {
            self.pending.push_back(range);
            return;
        }
        match level {
            Level::Paragraph => {
                for sentence in sentence_ranges(self.text, range) {
                    self.split_into(sentence, Level::Sentence);
                }
            }
            Level::Sentence => {
                for word in word_ranges(self.text, range) {
                    self.split_into(word, Level::Word);
                }
            }
            Level::Word => {
                let pieces = force_split(self.text, range, self.counter, self.max_tokens);
                self.pending.extend(pieces);
            }
        }
    }
}

impl Iterator for Units<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(unit) = self.pending.pop_front() {
                return Some(unit);
            }
            if self.pos >= self.text.len() {
                return None;
            }
            let end = paragraph_end(self.text, self.pos);
            let paragraph = self.pos..end;
            self.pos = end;
            self.split_into(paragraph, Level::Paragraph);
        }
    }
}

/// End of the paragraph starting at `start`: just past the whitespace run
/// that contains a blank line, or the end of the text.
pub fn paragraph_end(text: &str, start: usize) -> usize {
    let body = text[start..]
        .find(|c: char| !c.is_whitespace())
        .map_or(text.len(), |o| start + o);

    let mut search = body;
    while let Some(off) = text[search..].find('\n') {
        let newline = search + off;
        let run_end = text[newline..]
            .find(|c: char| !c.is_whitespace())
            .map_or(text.len(), |o| newline + o);
        if text[newline..run_end].matches('\n').count() >= 2 {
            return run_end;
        }
        search = newline + 1;
    }
    text.len()
}

/// Sentence ranges inside `range`. A sentence ends after `.`, `!` or `?`
/// (plus any closing quote or bracket) when followed by whitespace and a
/// character that is not lowercase, so "e.g. the" stays together.
pub fn sentence_ranges(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut chars = slice.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, closer)) = chars.peek() {
            if matches!(closer, '"' | '\'' | ')' | ']' | '”' | '’') {
                end = j + closer.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let rest = &slice[end..];
        let ws_len = rest.len() - rest.trim_start().len();
        if ws_len == 0 {
            continue;
        }
        let next_char = rest[ws_len..].chars().next();
        if next_char.is_some_and(char::is_lowercase) {
            continue;
        }
        let boundary = end + ws_len;
        out.push(range.start + start..range.start + boundary);
        start = boundary;
        while chars.peek().is_some_and(|&(j, _)| j < boundary) {
            chars.next();
        }
    }

    if start < slice.len() {
        out.push(range.start + start..range.end);
    }
    out
}

/// Word ranges inside `range`, each word carrying its trailing whitespace.
/// Leading whitespace is attached to the first word.
pub(crate) fn word_ranges(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let slice = &text[range.clone()];
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut in_space = true;
    let mut seen_word = false;

    for (i, c) in slice.char_indices() {
        let space = c.is_whitespace();
        if !space && in_space && seen_word {
            out.push(range.start + start..range.start + i);
            start = i;
        }
        if !space {
            seen_word = true;
        }
        in_space = space;
    }
    if start < slice.len() {
        out.push(range.start + start..range.end);
    }
    out
}

/// Cut `range` at character boundaries into the longest pieces that fit.
/// Always makes progress: a single character that still exceeds the budget
/// becomes its own piece.
pub(crate) fn force_split(
    text: &str,
    range: Range<usize>,
    counter: &dyn TokenCounter,
    max_tokens: usize,
) -> Vec<Range<usize>> {
    let mut bounds: Vec<usize> = text[range.clone()]
        .char_indices()
        .map(|(i, _)| range.start + i)
        .collect();
    bounds.push(range.end);

    let mut out = Vec::new();
    let mut lo = 0usize;
    while lo + 1 < bounds.len() {
        // Largest hi such that text[bounds[lo]..bounds[hi]] fits.
        let (mut ok, mut bad) = (lo + 1, bounds.len());
        while ok + 1 < bad {
            let mid = (ok + bad) / 2;
            if counter.count(&text[bounds[lo]..bounds[mid]]) <= max_tokens {
                ok = mid;
            } else {
                bad = mid;
            }
        }
        out.push(bounds[lo]..bounds[ok]);
        lo = ok;
    }
    out
}
