//! Response extractor: best-effort `(category, plain_english, confidence)`
//! from whatever the adapter observed.
//!
//! Strategy order: strict JSON parse of structured arguments, regex recovery
//! of the two fields from malformed arguments, embedded-JSON search in
//! freeform content, keyword-guess fallback. A parse failure is never an
//! outward error; it only shows up in the confidence tier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::adapter::CompletionReply;
use crate::category::Category;
use crate::lexicon::LexiconEngine;

/// Shown to callers when even the freeform content is unusable.
pub const UNTRANSLATABLE_NOTICE: &str = "Unable to translate this text into plain English.";

/// Degradation tier of the extraction. Never silently upgraded; the one
/// exception is the explicit `Adjusted` marker set when the corrector
/// changes a high-confidence extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseConfidence {
    /// Strict JSON parse of the structured arguments succeeded first try.
    High,
    /// Fields recovered by regex, or JSON dug out of freeform content.
    Medium,
    /// Raw text passed through; nothing structured was recovered.
    Low,
    /// High-confidence extraction overridden by the corrector.
    Adjusted,
    /// Category came from the keyword guess, not the model.
    Heuristic,
}

impl ParseConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseConfidence::High => "high",
            ParseConfidence::Medium => "medium",
            ParseConfidence::Low => "low",
            ParseConfidence::Adjusted => "adjusted",
            ParseConfidence::Heuristic => "heuristic",
        }
    }
}

/// Transient per-request extraction state; consumed by the corrector and the
/// paraphrase guarantor, then discarded once the response is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub category: Option<Category>,
    pub plain_english: String,
    pub parse_confidence: ParseConfidence,
}

#[derive(Deserialize)]
struct RawArgs {
    #[serde(default)]
    category: String,
    #[serde(default)]
    plain_english: String,
}

static RE_CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""category"\s*:\s*"([^"]*)""#).expect("category regex"));
static RE_PLAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""plain_english"\s*:\s*"([^"]*)""#).expect("plain_english regex"));

/// Produce an `ExtractionResult` from the adapter's tagged reply.
pub fn extract(
    reply: &CompletionReply,
    original: &str,
    lexicon: &LexiconEngine,
) -> ExtractionResult {
    match reply {
        CompletionReply::ToolCall { arguments } | CompletionReply::FunctionCall { arguments } => {
            from_arguments(arguments, original, lexicon)
        }
        CompletionReply::Content { text } => from_content(text, original, lexicon),
        CompletionReply::Absent => from_content("", original, lexicon),
    }
}

/// Structured arguments present: strict parse, then regex recovery, then the
/// whole raw string as the paraphrase.
fn from_arguments(arguments: &str, original: &str, lexicon: &LexiconEngine) -> ExtractionResult {
    if let Ok(args) = serde_json::from_str::<RawArgs>(arguments) {
        return finish(
            Category::parse_lenient(&args.category),
            args.plain_english,
            ParseConfidence::High,
            original,
            lexicon,
        );
    }

    let cat = RE_CATEGORY
        .captures(arguments)
        .map(|c| c[1].to_string());
    let plain = RE_PLAIN.captures(arguments).map(|c| c[1].to_string());
    if let (Some(cat), Some(plain)) = (cat, plain) {
        return finish(
            Category::parse_lenient(&cat),
            plain,
            ParseConfidence::Medium,
            original,
            lexicon,
        );
    }

    finish(
        None,
        arguments.to_string(),
        ParseConfidence::Low,
        original,
        lexicon,
    )
}

/// No structured call at all: look for an embedded `{...}` object, else fall
/// back to keyword evidence plus the content (or a generated notice).
fn from_content(content: &str, original: &str, lexicon: &LexiconEngine) -> ExtractionResult {
    if let Some(obj) = embedded_object(content) {
        if let Ok(args) = serde_json::from_str::<RawArgs>(obj) {
            return finish(
                Category::parse_lenient(&args.category),
                args.plain_english,
                ParseConfidence::Medium,
                original,
                lexicon,
            );
        }
    }

    let plain = if content.trim().is_empty() {
        UNTRANSLATABLE_NOTICE.to_string()
    } else {
        content.to_string()
    };
    finish(None, plain, ParseConfidence::Low, original, lexicon)
}

/// Widest `{...}` span in the content, if any.
fn embedded_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// Edge case shared by every strategy: a blank model-declared category gets a
/// keyword-guess fallback, tagged `heuristic` to stay distinct from a
/// corrector override. With no keyword evidence the tier is left as-is.
fn finish(
    category: Option<Category>,
    plain_english: String,
    tier: ParseConfidence,
    original: &str,
    lexicon: &LexiconEngine,
) -> ExtractionResult {
    match category {
        Some(cat) => ExtractionResult {
            category: Some(cat),
            plain_english,
            parse_confidence: tier,
        },
        None => match lexicon.keyword_guess(original) {
            Some(guess) => ExtractionResult {
                category: Some(guess),
                plain_english,
                parse_confidence: ParseConfidence::Heuristic,
            },
            None => ExtractionResult {
                category: None,
                plain_english,
                parse_confidence: tier,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex() -> LexiconEngine {
        LexiconEngine::from_toml().expect("lexicons")
    }

    fn tool(arguments: &str) -> CompletionReply {
        CompletionReply::ToolCall {
            arguments: arguments.to_string(),
        }
    }

    #[test]
    fn strict_json_is_high_confidence() {
        let r = extract(
            &tool(r#"{"category":"Contract","plain_english":"You must pay."}"#),
            "The lessee shall pay.",
            &lex(),
        );
        assert_eq!(r.category, Some(Category::Contract));
        assert_eq!(r.plain_english, "You must pay.");
        assert_eq!(r.parse_confidence, ParseConfidence::High);
    }

    #[test]
    fn regex_recovery_from_malformed_json_is_medium() {
        // Trailing comma makes strict parsing fail; both fields still present.
        let r = extract(
            &tool(r#"{"category":"Real Estate","plain_english":"The landlord owns it.",}"#),
            "whatever",
            &lex(),
        );
        assert_eq!(r.category, Some(Category::RealEstate));
        assert_eq!(r.plain_english, "The landlord owns it.");
        assert_eq!(r.parse_confidence, ParseConfidence::Medium);
    }

    #[test]
    fn hopeless_arguments_pass_through_as_low() {
        let r = extract(&tool("not a json"), "Some unclassifiable gibberish here", &lex());
        assert_eq!(r.category, None);
        assert_eq!(r.plain_english, "not a json");
        assert_eq!(r.parse_confidence, ParseConfidence::Low);
    }

    #[test]
    fn malformed_arguments_over_keyword_text_get_heuristic_fill() {
        // The raw string still passes through, but the category comes from
        // keyword evidence in the original text.
        let r = extract(
            &tool("not a json"),
            "This is a breach of the agreement and its warranty.",
            &lex(),
        );
        assert_eq!(r.category, Some(Category::Contract));
        assert_eq!(r.plain_english, "not a json");
        assert_eq!(r.parse_confidence, ParseConfidence::Heuristic);
    }

    #[test]
    fn embedded_object_in_freeform_content_is_medium() {
        let reply = CompletionReply::Content {
            text: "Sure! Here you go: {\"category\":\"Family Law\",\"plain_english\":\"It is about divorce.\"} Hope that helps.".into(),
        };
        let r = extract(&reply, "whatever", &lex());
        assert_eq!(r.category, Some(Category::FamilyLaw));
        assert_eq!(r.parse_confidence, ParseConfidence::Medium);
    }

    #[test]
    fn freeform_without_json_uses_keyword_guess_as_heuristic() {
        let reply = CompletionReply::Content {
            text: "This seems to discuss a rental situation.".into(),
        };
        let r = extract(&reply, "The landlord may terminate the lease.", &lex(),
        );
        assert_eq!(r.category, Some(Category::RealEstate));
        assert_eq!(r.plain_english, "This seems to discuss a rental situation.");
        assert_eq!(r.parse_confidence, ParseConfidence::Heuristic);
    }

    #[test]
    fn absent_reply_yields_notice() {
        let r = extract(&CompletionReply::Absent, "no keywords in here at all", &lex());
        assert_eq!(r.category, None);
        assert_eq!(r.plain_english, UNTRANSLATABLE_NOTICE);
        assert_eq!(r.parse_confidence, ParseConfidence::Low);
    }

    #[test]
    fn blank_declared_category_gets_heuristic_fill() {
        let r = extract(
            &tool(r#"{"category":"","plain_english":"You get the house."}"#),
            "I bequeath my house to my heir.",
            &lex(),
        );
        assert_eq!(r.category, Some(Category::WillsTrustsEstates));
        assert_eq!(r.parse_confidence, ParseConfidence::Heuristic);
    }

    #[test]
    fn high_never_without_strict_parse() {
        // Every non-strict path must end below High.
        let samples = [
            tool("not a json"),
            tool(r#""category":"Contract" "plain_english":"x""#),
            CompletionReply::Content { text: "plain".into() },
            CompletionReply::Absent,
        ];
        for s in samples {
            let r = extract(&s, "nothing legal here", &lex());
            assert_ne!(r.parse_confidence, ParseConfidence::High);
        }
    }
}
