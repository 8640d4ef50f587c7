//! Text utilities shared by the renderers: segmentation, key terms and
//! definitional sentence detection.

use std::collections::HashSet;

use indexmap::IndexMap;
use studynotes_ingest::{paragraph_end, sentence_ranges};

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "even",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "may", "me", "might", "more", "most", "much", "must", "my", "no", "nor", "not", "now", "of",
    "off", "on", "once", "one", "only", "or", "other", "our", "out", "over", "own", "same",
    "shall", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "thus", "to", "too", "under",
    "until", "up", "upon", "us", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your",
];

/// Subjects that make a poor "What is X?" question.
const PRONOUN_SUBJECTS: &[&str] = &[
    "it", "this", "that", "these", "those", "they", "there", "he", "she", "which", "what",
];

const ARTICLES: &[&str] = &["the", "a", "an"];

/// Conjunctions that open a new clause after a comma.
const CLAUSE_OPENERS: &[&str] = &[
    "and", "but", "or", "which", "while", "whereas", "because", "so", "although", "though",
];

/// Verb phrases introducing a definition, longest first.
const DEFINITION_VERBS: &[&str] = &[" refers to ", " is defined as ", " means ", " is ", " are "];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}

/// Paragraphs separated by blank lines, trimmed and non-empty.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let end = paragraph_end(text, pos);
        let para = text[pos..end].trim();
        if !para.is_empty() {
            out.push(para);
        }
        pos = end;
    }
    out
}

/// Sentences of `text`, trimmed and in order.
pub fn sentences(text: &str) -> Vec<&str> {
    paragraphs(text)
        .into_iter()
        .flat_map(|para| {
            sentence_ranges(para, 0..para.len())
                .into_iter()
                .map(move |r| para[r].trim())
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Clauses of one sentence: split on `;` and `:` and on commas that open
/// a conjunction clause.
pub fn clauses(sentence: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for part in sentence.split([';', ':']) {
        let mut start = 0;
        for (i, _) in part.match_indices(", ") {
            let next = part[i + 2..].split_whitespace().next().unwrap_or("");
            if CLAUSE_OPENERS.contains(&next.to_lowercase().as_str()) {
                out.push(part[start..i].trim());
                start = i + 2;
            }
        }
        out.push(part[start..].trim());
    }
    out.retain(|c| !c.is_empty());
    out
}

/// Alphanumeric words, with inner hyphens and apostrophes kept.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .map(|w| w.trim_matches(|c: char| c == '-' || c == '\''))
        .filter(|w| !w.is_empty())
}

/// Lowercased content words: no stopwords, no numbers, at least 3 chars.
pub fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    words(text)
        .filter(|w| w.chars().count() >= 3 && w.chars().any(char::is_alphabetic))
        .filter(|w| !is_stopword(w))
        .map(str::to_lowercase)
}

/// Content word frequencies in first-seen order.
pub fn term_frequencies(text: &str) -> IndexMap<String, usize> {
    let mut freq = IndexMap::new();
    for word in content_words(text) {
        *freq.entry(word).or_insert(0) += 1;
    }
    freq
}

/// The `limit` most frequent content words; ties keep first-seen order.
pub fn key_terms(text: &str, limit: usize) -> Vec<String> {
    let mut ranked: Vec<(String, usize)> = term_frequencies(text).into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(term, _)| term).collect()
}

/// Highest-scoring content word of `sentence` under document frequencies.
pub fn top_term(sentence: &str, freq: &IndexMap<String, usize>) -> Option<String> {
    let mut best: Option<(String, usize)> = None;
    for word in content_words(sentence) {
        let score = freq.get(&word).copied().unwrap_or(0);
        if best.as_ref().map_or(true, |(_, s)| score > *s) {
            best = Some((word, score));
        }
    }
    best.map(|(word, _)| word)
}

/// Key-term score of a passage: document frequency summed over its
/// distinct content words.
pub fn score(passage: &str, freq: &IndexMap<String, usize>) -> usize {
    let distinct: HashSet<String> = content_words(passage).collect();
    distinct.iter().filter_map(|w| freq.get(w)).sum()
}

/// Uppercase the first letter of each word.
pub fn title_case(term: &str) -> String {
    term.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first letter only.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-insensitive key for duplicate detection: lowercase, articles
/// dropped, trailing plural `s` removed from each word.
pub fn stem_key(phrase: &str) -> String {
    words(phrase)
        .map(str::to_lowercase)
        .filter(|w| !ARTICLES.contains(&w.as_str()))
        .map(|w| match w.strip_suffix('s') {
            Some(stem) if stem.len() >= 3 && !stem.ends_with('s') => stem.to_string(),
            _ => w,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A sentence of the form "X is/are/refers to/means Y".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition<'a> {
    pub subject: &'a str,
    pub plural: bool,
}

/// Detect a definitional sentence. The subject must be one to six words,
/// not a pronoun, and followed by a non-empty definition.
pub fn definition(sentence: &str) -> Option<Definition<'_>> {
    // ASCII lowering keeps byte offsets valid for slicing `sentence`.
    let lowered = sentence.to_ascii_lowercase();
    let (at, verb) = DEFINITION_VERBS
        .iter()
        .filter_map(|verb| lowered.find(verb).map(|at| (at, *verb)))
        .min_by_key(|(at, _)| *at)?;

    let subject = sentence.get(..at)?.trim().trim_end_matches(',');
    let rest = sentence.get(at + verb.len()..)?.trim();
    let subject_words = subject.split_whitespace().count();
    if !(1..=6).contains(&subject_words) || words(rest).next().is_none() {
        return None;
    }
    let first = subject.split_whitespace().next()?.to_lowercase();
    if PRONOUN_SUBJECTS.contains(&first.as_str()) {
        return None;
    }
    Some(Definition {
        subject: strip_article(subject),
        plural: verb == " are ",
    })
}

/// Drop a leading article from a subject phrase.
pub fn strip_article(subject: &str) -> &str {
    let mut parts = subject.splitn(2, char::is_whitespace);
    match (parts.next(), parts.next()) {
        (Some(first), Some(rest)) if ARTICLES.contains(&first.to_lowercase().as_str()) => {
            rest.trim_start()
        }
        _ => subject,
    }
}

/// Sentence text with terminal punctuation normalized to a single period,
/// unless it already ends in `?` or `!`.
pub fn as_statement(text: &str) -> String {
    let trimmed = text.trim().trim_end_matches([',', ';', ':', '.']);
    if trimmed.ends_with(['?', '!']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Topic sections built from adjacent-sentence lexical overlap.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub sentences: Vec<&'a str>,
    /// Most frequent content word of the section, if any.
    pub topic: Option<String>,
}

impl Section<'_> {
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }

    pub fn heading(&self) -> String {
        self.topic
            .as_deref()
            .map(title_case)
            .unwrap_or_else(|| "Overview".to_string())
    }
}

/// Sentences per section before a topic break is considered.
const MIN_SECTION_SENTENCES: usize = 2;
/// Sections are closed regardless of overlap past this size.
const MAX_SECTION_SENTENCES: usize = 6;
/// Jaccard overlap below which adjacent sentences start a new topic.
const TOPIC_BREAK_OVERLAP: f64 = 0.1;

/// Group sentences into topic sections. A section closes when the next
/// sentence shares too few content words with the previous one, once the
/// section has at least two sentences, or when it reaches six.
pub fn segment(text: &str) -> Vec<Section<'_>> {
    let all = sentences(text);
    let mut groups: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut prev_words: HashSet<String> = HashSet::new();

    for sentence in all {
        let words: HashSet<String> = content_words(sentence).collect();
        let overlap = jaccard(&prev_words, &words);
        let topic_break =
            current.len() >= MIN_SECTION_SENTENCES && overlap < TOPIC_BREAK_OVERLAP;
        if topic_break || current.len() >= MAX_SECTION_SENTENCES {
            groups.push(std::mem::take(&mut current));
        }
        current.push(sentence);
        prev_words = words;
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .map(|sentences| {
            let topic = key_terms(&sentences.join(" "), 1).into_iter().next();
            Section { sentences, topic }
        })
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_span_paragraphs() {
        let text = "First idea. Second idea!\n\nThird idea?";
        assert_eq!(sentences(text), vec!["First idea.", "Second idea!", "Third idea?"]);
    }

    #[test]
    fn clauses_split_on_conjunctions_and_semicolons() {
        let s = "Plants absorb light, and they release oxygen; roots take water";
        assert_eq!(
            clauses(s),
            vec!["Plants absorb light", "and they release oxygen", "roots take water"]
        );
        assert_eq!(clauses("Red, green, blue"), vec!["Red, green, blue"]);
    }

    #[test]
    fn key_terms_rank_by_frequency_then_order() {
        let text = "Cells divide. Cells grow. Energy powers cells and energy flows.";
        assert_eq!(key_terms(text, 2), vec!["cells", "energy"]);
    }

    #[test]
    fn content_words_skip_stopwords_and_numbers() {
        let found: Vec<String> = content_words("The 42 enzymes are in the cell").collect();
        assert_eq!(found, vec!["enzymes", "cell"]);
    }

    #[test]
    fn detects_definitions() {
        let d = definition("Photosynthesis is the process plants use to make food.").unwrap();
        assert_eq!(d.subject, "Photosynthesis");
        assert!(!d.plural);

        let d = definition("The ribosomes are sites of protein synthesis.").unwrap();
        assert_eq!(d.subject, "ribosomes");
        assert!(d.plural);

        let d = definition("Entropy refers to disorder in a system.").unwrap();
        assert_eq!(d.subject, "Entropy");
    }

    #[test]
    fn definition_subject_survives_non_ascii_case_folding() {
        // 'İ' grows from two to three bytes under full lowercasing.
        let d = definition("İstanbul İzmir is a pair of Turkish cities.").unwrap();
        assert_eq!(d.subject, "İstanbul İzmir");
        assert!(!d.plural);

        let d = definition("Ångström units ARE tiny lengths.").unwrap();
        assert_eq!(d.subject, "Ångström units");
        assert!(d.plural);
    }

    #[test]
    fn rejects_pronoun_and_long_subjects() {
        assert!(definition("It is important to study.").is_none());
        assert!(definition("One of the many things we learned last week in class is this.").is_none());
        assert!(definition("No verb here.").is_none());
    }

    #[test]
    fn stem_key_folds_case_articles_and_plurals() {
        assert_eq!(stem_key("The Enzymes"), stem_key("enzyme"));
        assert_eq!(stem_key("glass"), "glass");
    }

    #[test]
    fn statements_end_with_period() {
        assert_eq!(as_statement("cells divide,"), "cells divide.");
        assert_eq!(as_statement("Why?"), "Why?");
    }

    #[test]
    fn segmentation_breaks_on_topic_shift() {
        let text = "Mitosis divides cells. Mitosis has four phases. \
                    Volcanoes erupt lava. Volcanoes form mountains.";
        let sections = segment(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading(), "Mitosis");
        assert_eq!(sections[1].heading(), "Volcanoes");
    }

    #[test]
    fn short_text_is_one_section() {
        let sections = segment("Only one sentence here.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text(), "Only one sentence here.");
    }
}
