//! Map step, recursive reduction and the per-call failure policy.

use futures::stream::{self, StreamExt};
use studynotes_core::{LengthProfile, NotesError};
use studynotes_ingest::{chunk, Chunk, TokenCounter};
use tracing::{debug, info, warn};

use super::types::{Attempted, ChunkSummary, Synthesis};
use super::Orchestrator;
use crate::detail::{per_chunk, reduced};

const SUMMARY_SEPARATOR: &str = "\n\n";

/// Running counts across every engine call of one synthesis.
#[derive(Debug, Default)]
struct Tally {
    calls: usize,
    degraded: usize,
}

impl Tally {
    fn record(&mut self, attempted: &Attempted) {
        self.calls += attempted.calls;
        if attempted.summary.degraded {
            self.degraded += 1;
        }
    }
}

impl Orchestrator {
    /// Summarize `chunks` and fold them into one text bounded by `profile`.
    ///
    /// One chunk: its summary is the result. Several: summaries are joined
    /// in order, re-chunked and re-summarized until they fit one engine
    /// input, then reduced by a final call with the global profile.
    pub async fn synthesize(
        &self,
        chunks: Vec<Chunk>,
        profile: &LengthProfile,
    ) -> Result<Synthesis, NotesError> {
        if chunks.is_empty() {
            return Err(NotesError::EmptyInput);
        }
        let budget = self.input_budget();
        let mut tally = Tally::default();

        let chunk_profile = per_chunk(profile, chunks.len(), budget);
        let chunk_summaries = self.map(&chunks, chunk_profile, &mut tally).await?;

        if chunk_summaries.len() == 1 {
            info!(
                engine_calls = tally.calls,
                degraded = tally.degraded,
                "single chunk synthesized"
            );
            return Ok(Synthesis {
                text: chunk_summaries[0].text.clone(),
                engine_calls: tally.calls,
                reduction_rounds: 0,
                degraded_summaries: tally.degraded,
                chunk_summaries,
            });
        }

        let mut intermediate = join_summaries(&chunk_summaries);
        let mut rounds = 0;
        while self.counter.count(&intermediate) > budget {
            if rounds >= self.max_reduction_rounds {
                warn!(
                    rounds,
                    tokens = self.counter.count(&intermediate),
                    budget,
                    "reduction did not converge, truncating intermediate text"
                );
                intermediate =
                    truncate_to_tokens(&intermediate, budget, self.counter.as_ref()).to_string();
                break;
            }
            rounds += 1;

            let pieces: Vec<Chunk> =
                chunk(&intermediate, &self.chunking, self.counter.as_ref())?.collect();
            debug!(round = rounds, pieces = pieces.len(), "re-chunking intermediate summaries");
            let piece_profile = per_chunk(profile, pieces.len(), budget);
            let summaries = self.map(&pieces, piece_profile, &mut tally).await?;
            intermediate = join_summaries(&summaries);
        }

        let reduction = self
            .attempt("reduce", chunk_summaries.len(), &intermediate, *profile)
            .await?;
        tally.record(&reduction);

        info!(
            chunks = chunk_summaries.len(),
            engine_calls = tally.calls,
            reduction_rounds = rounds,
            degraded = tally.degraded,
            "document synthesized"
        );

        Ok(Synthesis {
            text: reduction.summary.text,
            chunk_summaries,
            engine_calls: tally.calls,
            reduction_rounds: rounds,
            degraded_summaries: tally.degraded,
        })
    }

    /// Summarize every chunk, at most `concurrency` calls in flight, and
    /// return the summaries in chunk order.
    async fn map(
        &self,
        chunks: &[Chunk],
        profile: LengthProfile,
        tally: &mut Tally,
    ) -> Result<Vec<ChunkSummary>, NotesError> {
        let results: Vec<Result<Attempted, NotesError>> = stream::iter(chunks)
            .map(|c| self.attempt("map", c.index, &c.content, profile))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summaries = Vec::with_capacity(results.len());
        for result in results {
            let attempted = result?;
            tally.record(&attempted);
            summaries.push(attempted.summary);
        }
        summaries.sort_by_key(|s| s.index);
        Ok(summaries)
    }

    /// One engine call with a single retry under reduced bounds. When both
    /// fail, the input truncated to `profile`'s max stands in as a degraded
    /// summary.
    async fn attempt(
        &self,
        stage: &'static str,
        index: usize,
        text: &str,
        profile: LengthProfile,
    ) -> Result<Attempted, NotesError> {
        let mut calls = 0;
        for bounds in [profile, reduced(&profile)] {
            if self.cancel.is_cancelled() {
                return Err(NotesError::Cancelled);
            }
            calls += 1;
            debug!(
                stage,
                index,
                attempt = calls,
                engine = self.engine.name(),
                min_len = bounds.min_output_tokens,
                max_len = bounds.max_output_tokens,
                "engine call"
            );
            match self
                .engine
                .summarize(text, bounds.min_output_tokens, bounds.max_output_tokens)
                .await
            {
                Ok(out) if !out.trim().is_empty() => {
                    return Ok(Attempted {
                        summary: ChunkSummary {
                            index,
                            text: out.trim().to_string(),
                            degraded: false,
                        },
                        calls,
                    });
                }
                Ok(_) => warn!(stage, index, attempt = calls, "engine returned empty summary"),
                Err(e) => warn!(stage, index, attempt = calls, error = %e, "engine call failed"),
            }
        }

        warn!(stage, index, "falling back to truncated source text");
        let fallback = truncate_to_tokens(
            text,
            profile.max_output_tokens as usize,
            self.counter.as_ref(),
        );
        Ok(Attempted {
            summary: ChunkSummary {
                index,
                text: fallback.to_string(),
                degraded: true,
            },
            calls,
        })
    }
}

fn join_summaries(summaries: &[ChunkSummary]) -> String {
    summaries
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR)
}

/// Longest prefix of `text` (trimmed) within `max_tokens`, cut at a word
/// boundary when one fits and at a character boundary otherwise. Never
/// empty for non-blank input.
pub(crate) fn truncate_to_tokens<'t>(
    text: &'t str,
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> &'t str {
    let text = text.trim();
    if counter.count(text) <= max_tokens {
        return text;
    }

    let word_ends: Vec<usize> = text
        .char_indices()
        .filter(|&(i, c)| c.is_whitespace() && !text[..i].ends_with(char::is_whitespace))
        .map(|(i, _)| i)
        .collect();
    if let Some(end) = longest_fitting(text, &word_ends, max_tokens, counter) {
        return &text[..end];
    }

    let char_ends: Vec<usize> = text
        .char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .collect();
    let end = longest_fitting(text, &char_ends, max_tokens, counter)
        .or_else(|| char_ends.first().copied())
        .unwrap_or(text.len());
    &text[..end]
}

/// Largest candidate end whose prefix fits, assuming the counter is
/// monotone over prefixes.
fn longest_fitting(
    text: &str,
    ends: &[usize],
    max_tokens: usize,
    counter: &dyn TokenCounter,
) -> Option<usize> {
    let fitting = ends.partition_point(|&end| counter.count(&text[..end]) <= max_tokens);
    fitting.checked_sub(1).map(|i| ends[i])
}
