use super::text::segment;

/// One paragraph per topic section under an inferred header. Sentences
/// are kept verbatim.
pub fn render(text: &str) -> String {
    segment(text)
        .iter()
        .enumerate()
        .map(|(i, section)| {
            format!(
                "📌 Section {}: {}\n{}",
                i + 1,
                section.heading(),
                section.text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
