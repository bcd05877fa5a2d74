//! Fast-path gate: short, obviously non-legal inputs skip the model call
//! and are echoed back under the catch-all category.

use crate::lexicon::LexiconEngine;
use crate::validate::LegalText;

/// Inputs with fewer words than this AND no legal-signal term are cheap-pathed.
/// The threshold favors false negatives (an unnecessary model call) over
/// false positives (misclassifying borderline legal text as trivial).
pub const FAST_PATH_MAX_WORDS: usize = 8;

/// Pure predicate over text content and length; no side effects.
pub fn should_fast_path(text: &LegalText, lexicon: &LexiconEngine) -> bool {
    text.word_count() < FAST_PATH_MAX_WORDS && !lexicon.has_legal_signal(text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconEngine;

    fn lex() -> LexiconEngine {
        LexiconEngine::from_toml().expect("lexicons")
    }

    #[test]
    fn short_non_legal_text_is_gated() {
        let t = LegalText::parse("I love going to movies.").unwrap();
        assert!(should_fast_path(&t, &lex()));
    }

    #[test]
    fn short_text_with_legal_signal_is_not_gated() {
        let t = LegalText::parse("The lease is void.").unwrap();
        assert!(!should_fast_path(&t, &lex()));
    }

    #[test]
    fn long_text_is_never_gated() {
        let t = LegalText::parse(
            "yesterday we went to the cinema and watched two very long movies back to back",
        )
        .unwrap();
        assert!(!should_fast_path(&t, &lex()));
    }

    #[test]
    fn seven_words_is_below_the_threshold() {
        let t = LegalText::parse("one two three four five six seven").unwrap();
        assert_eq!(t.word_count(), 7);
        assert!(should_fast_path(&t, &lex()));
    }
}
