//! Concept map: weighted key terms linked by co-occurrence.
//!
//! Nodes are runs of one to three content words, weighted by frequency with
//! earlier sentences counting more and capitalized mentions earning a bonus.
//! Edges count co-occurrence per sentence (1.0) and per paragraph (0.5);
//! pairs are stored under a normalized (low, high) node ordering.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use studynotes_core::DetailLevel;

use super::text::{capitalize, is_stopword, paragraphs, sentences, words};

const MAX_TERM_WORDS: usize = 3;
const SENTENCE_WEIGHT: f64 = 1.0;
const PARAGRAPH_WEIGHT: f64 = 0.5;
const CAPITAL_BONUS: f64 = 0.5;
/// Longest connecting phrase used as a relation label.
const MAX_RELATION_WORDS: usize = 4;
const DEFAULT_RELATION: &str = "related to";

/// Verbs and linking words that name a relation. They also break term runs.
const RELATION_CUES: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "causes", "cause", "caused", "includes", "include",
    "including", "contains", "contain", "produces", "produce", "produced", "requires", "require",
    "uses", "use", "used", "converts", "convert", "forms", "form", "leads", "lead", "results",
    "drives", "drive", "enables", "enable", "affects", "affect", "creates", "create", "becomes",
    "consists", "depends", "controls", "regulates", "supports", "needs", "into",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptNode {
    pub label: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
    pub relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConceptMap {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
}

#[derive(Debug)]
struct Candidate {
    surface: String,
    weight: f64,
    count: usize,
}

#[derive(Debug, Default)]
struct EdgeAcc {
    weight: f64,
    /// Directed label from the first sentence that produced one.
    relation: Option<(usize, usize, String)>,
}

fn is_cue(word: &str) -> bool {
    RELATION_CUES.contains(&word.to_lowercase().as_str())
}

fn is_term_word(word: &str) -> bool {
    word.chars().count() >= 3
        && word.chars().any(char::is_alphabetic)
        && !is_stopword(word)
        && !is_cue(word)
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Build the concept map for `text` with at most `4 + 2 × level` nodes.
pub fn build(text: &str, detail: DetailLevel) -> ConceptMap {
    let paras: Vec<Vec<Vec<&str>>> = paragraphs(text)
        .into_iter()
        .map(|p| sentences(p).into_iter().map(|s| words(s).collect()).collect())
        .collect();
    let total = paras.iter().map(Vec::len).sum::<usize>().max(1);

    let candidates = collect_candidates(&paras, total);
    let keys = select_nodes(&candidates, 4 + 2 * detail.get() as usize);
    let nodes: Vec<ConceptNode> = keys
        .iter()
        .map(|k| {
            let c = &candidates[k.as_str()];
            ConceptNode {
                label: capitalize(&c.surface),
                weight: c.weight,
            }
        })
        .collect();
    let node_words: Vec<Vec<String>> = keys
        .iter()
        .map(|k| k.split(' ').map(str::to_string).collect())
        .collect();

    let mut acc: IndexMap<(usize, usize), EdgeAcc> = IndexMap::new();
    for para in &paras {
        let mut in_paragraph: HashSet<usize> = HashSet::new();
        let mut sentence_pairs: HashSet<(usize, usize)> = HashSet::new();

        for sentence in para {
            let lowered: Vec<String> = sentence.iter().map(|w| w.to_lowercase()).collect();
            let present: Vec<(usize, usize, usize)> = node_words
                .iter()
                .enumerate()
                .filter_map(|(id, nw)| find_run(&lowered, nw).map(|at| (id, at, at + nw.len())))
                .collect();

            for (i, &(a, a_start, a_end)) in present.iter().enumerate() {
                in_paragraph.insert(a);
                for &(b, b_start, b_end) in &present[i + 1..] {
                    let key = (a.min(b), a.max(b));
                    sentence_pairs.insert(key);
                    let edge = acc.entry(key).or_default();
                    edge.weight += SENTENCE_WEIGHT;
                    if edge.relation.is_none() {
                        edge.relation = if a_start <= b_start {
                            relation(sentence, a_end, b_start).map(|r| (a, b, r))
                        } else {
                            relation(sentence, b_end, a_start).map(|r| (b, a, r))
                        };
                    }
                }
            }
        }

        let mut members: Vec<usize> = in_paragraph.into_iter().collect();
        members.sort_unstable();
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                if !sentence_pairs.contains(&(a, b)) {
                    acc.entry((a, b)).or_default().weight += PARAGRAPH_WEIGHT;
                }
            }
        }
    }

    let mut edges: Vec<ConceptEdge> = acc
        .into_iter()
        .map(|((a, b), e)| match e.relation {
            Some((source, target, relation)) => ConceptEdge {
                source,
                target,
                weight: e.weight,
                relation,
            },
            None => ConceptEdge {
                source: a,
                target: b,
                weight: e.weight,
                relation: DEFAULT_RELATION.to_string(),
            },
        })
        .collect();
    edges.sort_by(|x, y| y.weight.total_cmp(&x.weight));
    edges.truncate(2 * nodes.len());

    ConceptMap { nodes, edges }
}

/// Weighted 1–3 word runs of term words, keyed by their lowercase form.
/// Multi-word runs need at least two mentions to count.
fn collect_candidates(paras: &[Vec<Vec<&str>>], total: usize) -> IndexMap<String, Candidate> {
    let mut candidates: IndexMap<String, Candidate> = IndexMap::new();
    let mut position = 0usize;

    for sentence in paras.iter().flatten() {
        let weight = 1.0 + (total - position) as f64 / total as f64;
        position += 1;

        for start in 0..sentence.len() {
            for len in 1..=MAX_TERM_WORDS {
                let Some(run) = sentence.get(start..start + len) else {
                    break;
                };
                if !run.iter().all(|w| is_term_word(w)) {
                    break;
                }
                let surface = run.join(" ");
                let bonus = if start > 0 && run.iter().all(|w| is_capitalized(w)) {
                    CAPITAL_BONUS
                } else {
                    0.0
                };
                let entry = candidates
                    .entry(surface.to_lowercase())
                    .or_insert_with(|| Candidate {
                        surface,
                        weight: 0.0,
                        count: 0,
                    });
                entry.weight += weight + bonus;
                entry.count += 1;
            }
        }
    }

    candidates.retain(|key, c| !key.contains(' ') || c.count >= 2);
    candidates
}

/// Top candidates by weight, skipping any that contain or sit inside an
/// already selected term.
fn select_nodes(candidates: &IndexMap<String, Candidate>, limit: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, &Candidate)> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.1.weight.total_cmp(&a.1.weight));

    let mut chosen: Vec<String> = Vec::new();
    for (key, _) in ranked {
        if chosen.len() >= limit {
            break;
        }
        let overlaps = chosen
            .iter()
            .any(|c| contains_phrase(c, key) || contains_phrase(key, c));
        if !overlaps {
            chosen.push(key.clone());
        }
    }
    chosen
}

fn contains_phrase(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

/// Word index where `run` first occurs in `words`.
fn find_run(words: &[String], run: &[String]) -> Option<usize> {
    if run.is_empty() || run.len() > words.len() {
        return None;
    }
    words.windows(run.len()).position(|w| w == run)
}

/// Connecting phrase between two terms when it is short and names a
/// relation.
fn relation(sentence: &[&str], from: usize, to: usize) -> Option<String> {
    let between = sentence.get(from..to)?;
    if between.is_empty() || between.len() > MAX_RELATION_WORDS {
        return None;
    }
    if !between.iter().any(|w| is_cue(w)) {
        return None;
    }
    Some(between.join(" ").to_lowercase())
}

pub fn render(text: &str, detail: DetailLevel) -> String {
    let map = build(text, detail);
    let mut out = String::from("Key Concepts:\n");
    if map.nodes.is_empty() {
        out.push_str("  (no key terms found)\n");
    }
    for (i, node) in map.nodes.iter().enumerate() {
        out.push_str(&format!("  {}. {} ({:.1})\n", i + 1, node.label, node.weight));
    }

    out.push_str("\nRelationships:\n");
    if map.edges.is_empty() {
        out.push_str("  (none found)");
    }
    let lines: Vec<String> = map
        .edges
        .iter()
        .map(|e| {
            format!(
                "  {} --[{}]--> {} ({:.1})",
                map.nodes[e.source].label, e.relation, map.nodes[e.target].label, e.weight
            )
        })
        .collect();
    out.push_str(&lines.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: i64) -> DetailLevel {
        DetailLevel::new(n).unwrap()
    }

    fn edge<'m>(map: &'m ConceptMap, a: &str, b: &str) -> Option<&'m ConceptEdge> {
        map.edges.iter().find(|e| {
            let (s, t) = (&map.nodes[e.source].label, &map.nodes[e.target].label);
            (s == a && t == b) || (s == b && t == a)
        })
    }

    #[test]
    fn same_sentence_edge_carries_relation_cue() {
        let text = "Photosynthesis produces oxygen. Oxygen supports animals. \
                    Photosynthesis needs sunlight.";
        let map = build(text, level(1));
        let e = edge(&map, "Photosynthesis", "Oxygen").unwrap();
        assert_eq!(map.nodes[e.source].label, "Photosynthesis");
        assert_eq!(map.nodes[e.target].label, "Oxygen");
        assert_eq!(e.relation, "produces");
        assert_eq!(e.weight, 1.0);
    }

    #[test]
    fn paragraph_edges_are_weaker_and_local() {
        let text = "Enzymes speed reactions. Substrates bind enzymes.\n\nVolcanoes erupt magma.";
        let map = build(text, level(5));
        assert_eq!(edge(&map, "Enzymes", "Reactions").unwrap().weight, 1.0);
        let weak = edge(&map, "Reactions", "Substrates").unwrap();
        assert_eq!(weak.weight, 0.5);
        assert_eq!(weak.relation, DEFAULT_RELATION);
        assert!(edge(&map, "Enzymes", "Volcanoes").is_none());
    }

    #[test]
    fn capitalized_terms_get_a_bonus() {
        let map = build("Researchers praised Newton. Gravity puzzled researchers.", level(3));
        assert_eq!(map.nodes[0].label, "Researchers");
        assert_eq!(map.nodes[1].label, "Newton");
    }

    #[test]
    fn node_count_capped_by_level() {
        let text = (0..30)
            .map(|i| format!("Alpha{i} meets beta{i}."))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(build(&text, level(1)).nodes.len(), 6);
        assert_eq!(build(&text, level(5)).nodes.len(), 14);
    }

    #[test]
    fn render_lists_nodes_then_edges() {
        let out = render("Photosynthesis produces oxygen.", level(2));
        assert!(out.starts_with("Key Concepts:\n  1. Photosynthesis"));
        assert!(out.contains("Relationships:\n  Photosynthesis --[produces]--> Oxygen (1.0)"));
    }

    #[test]
    fn stopword_text_reports_no_key_terms() {
        assert!(build("It is so.", level(3)).nodes.is_empty());
        assert_eq!(
            render("It is so.", level(3)),
            "Key Concepts:\n  (no key terms found)\n\nRelationships:\n  (none found)"
        );
    }

    #[test]
    fn map_is_deterministic() {
        let text = "Cells store energy. Energy drives cells.\n\nMitochondria make energy.";
        assert_eq!(build(text, level(4)), build(text, level(4)));
    }
}
