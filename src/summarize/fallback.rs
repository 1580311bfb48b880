//! Deterministic extractive fallback summarization.

/// Minimum sentence length admitted into the extractive summary.
const MIN_SENTENCE_CHARS: usize = 20;

/// Number of sentences kept in the extractive summary.
const MAX_SENTENCES: usize = 3;

/// Emitted when every sentence is discarded.
pub const FALLBACK_PLACEHOLDER: &str = "Document received; no summary could be generated.";

/// Build a deterministic extractive summary from raw content.
///
/// Splits on `.`, `!`, `?`, discards sentences shorter than 20 characters,
/// and joins the first three that remain. Never fails; an empty or
/// all-short input yields the fixed placeholder sentence.
pub fn extractive_summary(content: &str) -> String {
    let sentences: Vec<&str> = content
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)
        .take(MAX_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return FALLBACK_PLACEHOLDER.to_string();
    }

    let mut summary = sentences.join(". ");
    summary.push('.');
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_three_long_sentences() {
        let content = "The ventilation system failed during inspection. Crews isolated the \
                       affected shaft immediately. A replacement fan is on order. Further \
                       checks are scheduled for next week.";
        let summary = extractive_summary(content);
        assert!(summary.starts_with("The ventilation system failed"));
        assert!(summary.contains("replacement fan"));
        assert!(!summary.contains("next week"));
    }

    #[test]
    fn short_sentences_are_discarded() {
        let content = "Noted. Fine. The inspection uncovered water damage near the escalator.";
        let summary = extractive_summary(content);
        assert_eq!(
            summary,
            "The inspection uncovered water damage near the escalator."
        );
    }

    #[test]
    fn all_short_input_yields_placeholder() {
        assert_eq!(extractive_summary("Ok. Sure. Done."), FALLBACK_PLACEHOLDER);
        assert_eq!(extractive_summary(""), FALLBACK_PLACEHOLDER);
    }

    #[test]
    fn exclamations_and_questions_delimit_sentences() {
        let content = "Evacuate the lower concourse now! Did anyone notify the duty manager?";
        let summary = extractive_summary(content);
        assert!(summary.contains("Evacuate the lower concourse now"));
        assert!(summary.contains("notify the duty manager"));
    }
}
