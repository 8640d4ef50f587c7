use studynotes_core::DetailLevel;

use super::text::{as_statement, capitalize, clauses, score, sentences, term_frequencies};

/// Points shorter than this carry no information.
const MIN_POINT_CHARS: usize = 10;

/// Point cap per level; the top level keeps every point.
fn point_cap(detail: DetailLevel) -> usize {
    match detail.get() {
        1 => 3,
        2 => 5,
        3 => 8,
        4 => 12,
        _ => usize::MAX,
    }
}

/// Highest-scoring sentences (or clauses at levels 4 and 5) as bullet
/// points, emitted in narrative order.
pub fn render(text: &str, detail: DetailLevel) -> String {
    let freq = term_frequencies(text);
    let candidates: Vec<&str> = if detail.get() >= 4 {
        sentences(text).into_iter().flat_map(clauses).collect()
    } else {
        sentences(text)
    };
    let informative: Vec<&str> = candidates
        .into_iter()
        .filter(|p| p.chars().count() >= MIN_POINT_CHARS)
        .collect();
    // Terse text: rank every sentence rather than emit nothing.
    let candidates = if informative.is_empty() {
        sentences(text)
    } else {
        informative
    };

    let mut ranked: Vec<(usize, usize)> = candidates
        .iter()
        .enumerate()
        .map(|(i, p)| (i, score(p, &freq)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let mut keep: Vec<usize> = ranked
        .into_iter()
        .take(point_cap(detail))
        .map(|(i, _)| i)
        .collect();
    keep.sort_unstable();

    keep.into_iter()
        .map(|i| format!("• {}", capitalize(&as_statement(candidates[i]))))
        .collect::<Vec<_>>()
        .join("\n")
}
