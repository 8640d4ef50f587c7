//! Detail-level mapping: the 1–5 knob to engine output bounds.

use studynotes_core::{DetailLevel, LengthProfile, NotesError};

/// Floor for per-chunk output when many chunks share one reduction call.
pub const MIN_CHUNK_OUTPUT_TOKENS: u32 = 16;

/// (min, max, ratio) per level, lowest level first. Max grows by 30 per
/// level from 130; min grows more slowly so higher levels get a looser
/// min/max ratio.
const LEVEL_TABLE: [(u32, u32, f32); 5] = [
    (45, 130, 0.10),
    (50, 160, 0.15),
    (55, 190, 0.20),
    (60, 220, 0.25),
    (65, 250, 0.30),
];

/// Map a raw detail level to its length profile.
///
/// Fails with `InvalidDetailLevel` outside 1..=5.
pub fn map_level(level: i64) -> Result<LengthProfile, NotesError> {
    DetailLevel::new(level).map(profile_for)
}

/// Length profile for an already validated level.
pub fn profile_for(level: DetailLevel) -> LengthProfile {
    let (min, max, ratio) = LEVEL_TABLE[(level.get() - DetailLevel::MIN) as usize];
    LengthProfile {
        min_output_tokens: min,
        max_output_tokens: max,
        compression_ratio: ratio,
    }
}

/// Per-chunk bounds when `chunk_count` summaries must later fit one engine
/// input of `input_budget` tokens.
///
/// A single chunk gets the global profile. Otherwise each chunk's max shrinks
/// to its share of the budget (never below [`MIN_CHUNK_OUTPUT_TOKENS`], never
/// above the global max) and min shrinks by the same factor.
pub fn per_chunk(global: &LengthProfile, chunk_count: usize, input_budget: usize) -> LengthProfile {
    if chunk_count <= 1 {
        return *global;
    }
    let share = u32::try_from(input_budget / chunk_count).unwrap_or(u32::MAX);
    let ceiling = global.max_output_tokens.max(MIN_CHUNK_OUTPUT_TOKENS);
    let max = share.clamp(MIN_CHUNK_OUTPUT_TOKENS, ceiling);

    let scaled_min = u64::from(global.min_output_tokens) * u64::from(max)
        / u64::from(global.max_output_tokens.max(1));
    let min = (scaled_min as u32).min(max - 1);

    LengthProfile {
        min_output_tokens: min,
        max_output_tokens: max,
        compression_ratio: global.compression_ratio,
    }
}

/// Retry bounds after a failed call: half the max, min kept below it.
pub fn reduced(profile: &LengthProfile) -> LengthProfile {
    let max = (profile.max_output_tokens / 2).max(1);
    LengthProfile {
        min_output_tokens: profile.min_output_tokens.min(max / 2),
        max_output_tokens: max,
        compression_ratio: profile.compression_ratio,
    }
}
