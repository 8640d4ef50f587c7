use std::collections::HashSet;

use indexmap::IndexMap;
use studynotes_core::DetailLevel;

use super::text::{definition, sentences, stem_key, term_frequencies, top_term};

/// Sentences shorter than this make no useful answer.
const MIN_ANSWER_CHARS: usize = 10;

/// Longest excerpt quoted in a fallback question.
const GIST_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Card<'a> {
    question: String,
    answer: &'a str,
}

/// Question for one sentence plus its duplicate-detection key.
pub(crate) fn question_for(
    sentence: &str,
    freq: &IndexMap<String, usize>,
) -> Option<(String, String)> {
    if let Some(def) = definition(sentence) {
        let verb = if def.plural { "are" } else { "is" };
        return Some((format!("What {verb} {}?", def.subject), stem_key(def.subject)));
    }
    let term = top_term(sentence, freq)?;
    let key = stem_key(&term);
    Some((format!("Define {term}"), key))
}

/// Build up to `3 × level` cards, synthesized text first and chunk
/// summaries after it, dropping questions whose subject was already asked.
fn cards<'a>(sources: &[&'a str], detail: DetailLevel) -> Vec<Card<'a>> {
    let cap = 3 * detail.get() as usize;
    let freq = term_frequencies(&sources.join("\n\n"));
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for sentence in sources.iter().copied().flat_map(sentences) {
        if out.len() >= cap {
            break;
        }
        if sentence.chars().count() < MIN_ANSWER_CHARS {
            continue;
        }
        let Some((question, key)) = question_for(sentence, &freq) else {
            continue;
        };
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        out.push(Card {
            question,
            answer: sentence,
        });
    }
    out
}

/// Single card about the opening sentence, for text with no askable
/// subject.
fn gist_card(text: &str) -> Option<Card<'_>> {
    let first = sentences(text).into_iter().next()?;
    let gist: String = first
        .trim_end_matches(['.', '!', '?'])
        .chars()
        .take(GIST_CHARS)
        .collect();
    let gist = if gist.trim().is_empty() { first } else { gist.trim() };
    Some(Card {
        question: format!("What is important about: {gist}?"),
        answer: first,
    })
}

pub fn render(text: &str, summaries: &[&str], detail: DetailLevel) -> String {
    let mut sources = vec![text];
    sources.extend(summaries.iter().copied());
    let mut cards = cards(&sources, detail);
    if cards.is_empty() {
        cards.extend(gist_card(text));
    }
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| format!("--- Card {} ---\nQ: {}\nA: {}", i + 1, card.question, card.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: i64) -> DetailLevel {
        DetailLevel::new(n).unwrap()
    }

    #[test]
    fn definitional_sentence_becomes_what_is() {
        let out = render("Osmosis is the movement of water across a membrane.", &[], level(3));
        assert_eq!(
            out,
            "--- Card 1 ---\nQ: What is Osmosis?\nA: Osmosis is the movement of water across a membrane."
        );
    }

    #[test]
    fn other_sentences_use_top_key_term() {
        let out = render(
            "Enzymes lower activation energy. Enzymes speed reactions.",
            &[],
            level(3),
        );
        assert!(out.contains("Q: Define enzymes"));
        // Both sentences share the subject; only one card survives.
        assert_eq!(out.matches("--- Card").count(), 1);
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        let text = "The Mitochondria are the powerhouse of the cell. \
                    MITOCHONDRIA are organelles with their own DNA.";
        let out = render(text, &[], level(3));
        assert_eq!(out.matches("--- Card").count(), 1);
    }

    #[test]
    fn card_count_capped_by_level() {
        let text = (0..20)
            .map(|i| format!("Topic{i} is fact number {i} worth learning."))
            .collect::<Vec<_>>()
            .join(" ");
        let out = render(&text, &[], level(1));
        assert_eq!(out.matches("--- Card").count(), 3);
        let out = render(&text, &[], level(4));
        assert_eq!(out.matches("--- Card").count(), 12);
    }

    #[test]
    fn text_without_subjects_gets_a_gist_card() {
        assert_eq!(
            render("It is so.", &[], level(3)),
            "--- Card 1 ---\nQ: What is important about: It is so?\nA: It is so."
        );
    }

    #[test]
    fn chunk_summaries_supplement_the_text() {
        let out = render(
            "Osmosis is the movement of water.",
            &["Diffusion is the spread of particles."],
            level(2),
        );
        assert!(out.contains("Q: What is Osmosis?"));
        assert!(out.contains("Q: What is Diffusion?"));
    }
}
