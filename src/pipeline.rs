//! Orchestrator: gate → adapter → extractor → corrector → guarantor.
//!
//! Each request flows forward through the pipeline exactly once; there is no
//! retry loop in the serving path. The only suspending step is the
//! completion call, whose failure is fatal for the request.

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::CompletionClient;
use crate::corrector;
use crate::error::ServiceError;
use crate::extract::{self, ParseConfidence};
use crate::gate;
use crate::lexicon::LexiconHandle;
use crate::paraphrase;
use crate::validate::LegalText;

/// Presentation-level confidence; a different axis than `parse_confidence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

/// The outward contract of `/simplify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifyResponse {
    pub response: String,
    pub category: String,
    pub confidence: Confidence,
    pub word_count: usize,
    pub parse_confidence: ParseConfidence,
}

/// Run the full pipeline for one validated request.
pub async fn simplify(
    text: &LegalText,
    lexicon: &LexiconHandle,
    client: &dyn CompletionClient,
    system_prompt: &str,
) -> Result<SimplifyResponse, ServiceError> {
    let word_count = text.word_count();
    let confidence = if word_count > 10 {
        Confidence::High
    } else {
        Confidence::Medium
    };

    // Fast path: short, obviously non-legal input skips the model call and
    // the rest of the pipeline; the trimmed input is echoed back verbatim.
    if lexicon.with(|lex| gate::should_fast_path(text, lex)) {
        counter!("simplify_fast_path_total").increment(1);
        debug!(word_count, "fast-path gate tripped");
        return Ok(SimplifyResponse {
            response: text.as_str().to_string(),
            category: crate::category::Category::Other.label().to_string(),
            confidence,
            word_count,
            parse_confidence: ParseConfidence::Heuristic,
        });
    }

    let reply = client
        .classify(system_prompt, text.as_str())
        .await
        .map_err(|e| {
            counter!("simplify_provider_errors_total").increment(1);
            ServiceError::Provider(e)
        })?;

    let extraction = lexicon.with(|lex| extract::extract(&reply, text.as_str(), lex));
    counter!(
        "simplify_parse_tier_total",
        "tier" => extraction.parse_confidence.as_str()
    )
    .increment(1);

    let correction = lexicon.with(|lex| corrector::correct(text.as_str(), lex, extraction.category));
    if correction.changed() {
        counter!("simplify_corrector_overrides_total").increment(1);
        debug!(rules = ?correction.applied, "corrector override");
    }

    // The explicit "adjusted" marker: a high-confidence extraction that the
    // corrector overrode. Lower tiers are never upgraded.
    let parse_confidence =
        if correction.changed() && extraction.parse_confidence == ParseConfidence::High {
            ParseConfidence::Adjusted
        } else {
            extraction.parse_confidence
        };

    let response = paraphrase::guarantee(text.as_str(), &extraction.plain_english, correction.category);

    Ok(SimplifyResponse {
        response,
        category: correction.category.label().to_string(),
        confidence,
        word_count,
        parse_confidence,
    })
}
