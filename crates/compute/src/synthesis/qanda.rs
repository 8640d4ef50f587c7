use std::collections::HashSet;

use studynotes_core::DetailLevel;

use super::flashcards::question_for;
use super::text::{definition, segment, stem_key, term_frequencies};

/// Question/answer pairs grouped under the same topic sections the summary
/// uses. Each section opens with an overview question, followed by its
/// definitional sentences. At most `3 × level` questions in total.
pub fn render(text: &str, detail: DetailLevel) -> String {
    let cap = 3 * detail.get() as usize;
    let freq = term_frequencies(text);
    let mut seen = HashSet::new();
    let mut number = 0;
    let mut blocks = Vec::new();

    for (i, section) in segment(text).iter().enumerate() {
        if number >= cap {
            break;
        }
        let heading = section.heading();
        let mut pairs = Vec::new();

        if let Some(topic) = &section.topic {
            seen.insert(stem_key(topic));
        }
        number += 1;
        pairs.push(format!(
            "Q{number}: What are the key points about {heading}?\nA{number}: {}",
            section.text()
        ));

        for sentence in &section.sentences {
            if number >= cap {
                break;
            }
            if definition(sentence).is_none() {
                continue;
            }
            let Some((question, key)) = question_for(sentence, &freq) else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }
            number += 1;
            pairs.push(format!("Q{number}: {question}\nA{number}: {sentence}"));
        }

        blocks.push(format!(
            "📌 Section {}: {}\n\n{}",
            i + 1,
            heading,
            pairs.join("\n\n")
        ));
    }
    blocks.join("\n\n")
}
