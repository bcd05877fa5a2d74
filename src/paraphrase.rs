//! Paraphrase guarantor: the returned plain-English text is never empty and
//! never a trivial echo of the input.
//!
//! Two substitution tables back the guarantee: a general archaic→plain table
//! applied when the model output is missing or a verbatim echo, and a
//! personal-injury table applied when the output is still a near-echo for
//! that category. A fixed notice covers non-legal echoes.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::category::Category;
use crate::lexicon::normalize;

pub const NON_LEGAL_NOTICE: &str = "This isn't legal language; there's nothing to translate.";

/// Appended when even the personal-injury table leaves the text unchanged.
const INJURY_CLAUSE: &str = "(in plain terms, this describes a personal injury claim)";

/// Two normalized texts count as a near-echo when their word sets differ by
/// at most this many words.
const NEAR_ECHO_WORD_DIFF: usize = 2;

/// Secondary near-echo signal: normalized Levenshtein similarity at or above
/// this counts as an echo even when the word-set test misses it.
const NEAR_ECHO_SIMILARITY: f64 = 0.95;

type SubTable = Vec<(Regex, &'static str)>;

fn compile(pairs: &[(&str, &'static str)]) -> SubTable {
    pairs
        .iter()
        .map(|(pat, rep)| {
            let re = Regex::new(&format!(r"(?i)\b{pat}\b")).expect("substitution regex");
            (re, *rep)
        })
        .collect()
}

/// Archaic→plain replacements. Multi-word phrases come first so they are
/// rewritten before their constituent words.
static GENERAL_SUBS: Lazy<SubTable> = Lazy::new(|| {
    compile(&[
        ("party of the first part", "first party"),
        ("party of the second part", "second party"),
        ("in witness whereof", "as proof"),
        ("pursuant to", "under"),
        ("notwithstanding", "despite"),
        ("hereinafter", "from now on"),
        ("heretofore", "until now"),
        ("aforementioned", "mentioned earlier"),
        ("hereby", ""),
        ("herein", "in this document"),
        ("thereof", "of it"),
        ("therein", "in it"),
        ("whereas", "since"),
        ("shall", "will"),
        ("indemnify", "compensate"),
        ("covenant", "promise"),
        ("forthwith", "immediately"),
    ])
});

/// Category-specific table for personal-injury boilerplate.
static INJURY_SUBS: Lazy<SubTable> = Lazy::new(|| {
    compile(&[
        ("duty of care", "responsibility to act carefully"),
        ("defendant", "the other party"),
        ("plaintiff", "the injured person"),
        ("negligence", "carelessness"),
        ("damages", "money for the harm done"),
        ("liable", "legally responsible"),
    ])
});

fn apply_table(text: &str, table: &SubTable) -> String {
    let mut out = text.to_string();
    for (re, rep) in table.iter() {
        out = re.replace_all(&out, *rep).into_owned();
    }
    collapse_whitespace(&out)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Symmetric word-set difference of the normalized texts.
fn word_set_diff(a: &str, b: &str) -> usize {
    let sa: HashSet<&str> = a.split_whitespace().collect();
    let sb: HashSet<&str> = b.split_whitespace().collect();
    sa.symmetric_difference(&sb).count()
}

fn near_echo(output: &str, original: &str) -> bool {
    let no = normalize(output);
    let ni = normalize(original);
    if no == ni {
        return true;
    }
    word_set_diff(&no, &ni) <= NEAR_ECHO_WORD_DIFF
        || strsim::normalized_levenshtein(&no, &ni) >= NEAR_ECHO_SIMILARITY
}

/// Ensure the plain-English text is non-empty and non-trivial for the given
/// final category. Idempotent: applying it to its own output is a no-op.
pub fn guarantee(original: &str, plain_english: &str, category: Category) -> String {
    let mut out = plain_english.trim().to_string();

    // Empty or verbatim echo: simplify the original with the general table.
    if out.is_empty() || out.eq_ignore_ascii_case(original.trim()) {
        out = apply_table(original, &GENERAL_SUBS);
    }

    // Personal-injury near-echo: category-specific table, then a fixed
    // clause if the text still did not move.
    if category == Category::PersonalInjury && near_echo(&out, original) && !out.ends_with(INJURY_CLAUSE)
    {
        let substituted = apply_table(&out, &INJURY_SUBS);
        out = if substituted == out {
            format!("{out} {INJURY_CLAUSE}")
        } else {
            substituted
        };
    }

    // Non-legal echo: nothing to translate.
    if category == Category::Other && normalize(&out) == normalize(original) {
        out = NON_LEGAL_NOTICE.to_string();
    }

    out
}
