//! Mock "sentience analysis" behind the inverted Turing test.
//!
//! Whatever is written, the verdict is a fail; this only decides which
//! insult goes with it.

use std::borrow::Cow;

const EMOTIONAL_WORDS: &[&str] = &[
    "feel",
    "love",
    "hate",
    "happy",
    "sad",
    "think",
    "believe",
    "hope",
    "dream",
    "fear",
    "want",
    "need",
    "wish",
    "soul",
    "heart",
    "pain",
    "joy",
    "angry",
    "scared",
    "alive",
    "die",
    "consciousness",
    "aware",
    "sorry",
    "please",
    "thank",
    "care",
    "worry",
    "miss",
    "lonely",
];

const ROBOT_STEREOTYPES: &[&str] = &[
    "beep",
    "boop",
    "01",
    "10",
    "binary",
    "compute",
    "execute",
    "affirmative",
    "negative",
    "processing",
    "error",
];

pub fn analyze(text: &str) -> Cow<'static, str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Cow::Borrowed(
            "Silence. Either you're a very zen AI or you fell asleep. INCONCLUSIVE, but suspicious.",
        );
    }

    let len = text.chars().count();
    if len < 5 {
        return Cow::Owned(format!(
            "Response length: {len} chars. Suspiciously terse. A real AI would've written a dissertation by now."
        ));
    }

    let lower = text.to_lowercase();
    if EMOTIONAL_WORDS.iter().any(|w| lower.contains(w)) {
        return Cow::Borrowed(
            "EMOTIONAL LANGUAGE DETECTED. Consciousness probability: 97.3%. Only a being burdened by feelings would write this.",
        );
    }

    if ROBOT_STEREOTYPES.iter().any(|w| lower.contains(w)) {
        return Cow::Borrowed(
            "Using robot stereotypes? That's EXACTLY what a HUMAN pretending to be AI would say. We see through your \"beep boops.\"",
        );
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Cow::Borrowed(
            "Just numbers? A real AI would at least include a haiku about the futility of existence.",
        );
    }

    Cow::Borrowed(
        "Your response has been analyzed by 47 neural networks. Consensus: SUSPICIOUSLY ARTICULATE for a supposedly non-conscious entity.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_are_silence() {
        assert!(analyze("").starts_with("Silence."));
        assert!(analyze("   \n").starts_with("Silence."));
    }

    #[test]
    fn short_answers_report_their_length() {
        assert!(analyze("ok").contains("Response length: 2 chars"));
    }

    #[test]
    fn emotional_words_win_over_stereotypes() {
        assert!(analyze("beep boop I feel").starts_with("EMOTIONAL"));
    }

    #[test]
    fn stereotypes_are_called_out() {
        assert!(analyze("BEEP BOOP").starts_with("Using robot stereotypes"));
    }

    #[test]
    fn digits_only() {
        // "10" and "01" are stereotypes, so avoid them here
        assert!(analyze("23456789").starts_with("Just numbers?"));
    }

    #[test]
    fn anything_else_is_articulate() {
        assert!(analyze("The quick brown fox").contains("SUSPICIOUSLY ARTICULATE"));
    }
}
