//! Category corrector: a rule cascade that re-examines the extracted
//! category against keyword evidence and may override it.
//!
//! Rules run as an ordered list of pure predicate→rewrite functions; each
//! sees the category as left by the previous rule, so later rules can
//! override earlier ones within the same pass. Specific strong markers
//! (bequeath, codicil, search warrant) always outrank generic hit counts;
//! counts only disambiguate when no strong marker exists.

use crate::category::Category;
use crate::lexicon::{term_present, LexiconEngine};

/// Outcome of the cascade: the (possibly identical) category plus the names
/// of the rules that fired, for logging and the `adjusted` confidence marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub category: Category,
    pub applied: Vec<&'static str>,
}

impl Correction {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Keyword evidence for one request, computed once and shared by all rules.
struct Evidence<'a> {
    text: &'a str,
    lexicon: &'a LexiconEngine,
}

impl Evidence<'_> {
    fn has(&self, term: &str) -> bool {
        term_present(self.text, term)
    }
    fn hits(&self, cat: Category) -> usize {
        self.lexicon.hits(cat, self.text)
    }
    /// Strong estate markers: bequeath, codicil, "last will", testament,
    /// "upon my death".
    fn estate_strong(&self) -> bool {
        self.lexicon.has_strong(Category::WillsTrustsEstates, self.text)
    }
    /// Strong criminal-procedure markers. The bare word "defendant" is
    /// deliberately not one of them.
    fn criminal_strong(&self) -> bool {
        self.lexicon.has_strong(Category::CriminalProcedure, self.text)
    }
    /// Injury evidence terms: damages, injury, injuries, duty of care,
    /// negligence.
    fn injury_evidence(&self) -> bool {
        self.lexicon.has_strong(Category::PersonalInjury, self.text)
    }
}

type Rule = fn(&Evidence, Category) -> Option<Category>;

/// The cascade, in evaluation order. Later rules win.
const RULES: &[(&str, Rule)] = &[
    ("personal_injury_promotion", personal_injury_promotion),
    ("catch_all_disambiguation", catch_all_disambiguation),
    ("estate_vs_contract", estate_vs_contract),
    ("criminal_vs_personal_injury", criminal_vs_personal_injury),
    ("real_estate_vs_estate", real_estate_vs_estate),
    ("global_estate_override", global_estate_override),
];

/// Run the cascade. A missing extracted category is treated as the catch-all
/// for rule purposes.
pub fn correct(text: &str, lexicon: &LexiconEngine, extracted: Option<Category>) -> Correction {
    let ev = Evidence { text, lexicon };
    let mut current = extracted.unwrap_or(Category::Other);
    let mut applied = Vec::new();

    for (name, rule) in RULES {
        if let Some(next) = rule(&ev, current) {
            if next != current {
                current = next;
                applied.push(*name);
            }
        }
    }

    Correction {
        category: current,
        applied,
    }
}

/// "plaintiff" together with injury evidence promotes to Personal Injury,
/// unless strong criminal-procedure markers take precedence.
fn personal_injury_promotion(ev: &Evidence, cat: Category) -> Option<Category> {
    if cat != Category::PersonalInjury
        && ev.has("plaintiff")
        && ev.injury_evidence()
        && !ev.criminal_strong()
    {
        return Some(Category::PersonalInjury);
    }
    None
}

/// Resolve the catch-all from lexicon evidence. Estate terms are checked
/// first, but agreement language without strong estate markers outweighs a
/// lone estate word and prefers Contract. After that, first lexicon match in
/// fixed priority order wins.
fn catch_all_disambiguation(ev: &Evidence, cat: Category) -> Option<Category> {
    if cat != Category::Other {
        return None;
    }

    if ev.hits(Category::WillsTrustsEstates) > 0 {
        if ev.has("agreement") && !ev.estate_strong() {
            return Some(Category::Contract);
        }
        return Some(Category::WillsTrustsEstates);
    }

    Category::NAMED_PRIORITY
        .into_iter()
        .filter(|&c| c != Category::WillsTrustsEstates)
        .find(|&c| ev.hits(c) > 0)
}

/// An estate classification with agreement language, no strong estate
/// marker, and no mention of "trust" is really a contract. Failing that, a
/// weakly estate-flavored text with two or more real-estate terms is
/// reclassified to Real Estate.
fn estate_vs_contract(ev: &Evidence, cat: Category) -> Option<Category> {
    if cat != Category::WillsTrustsEstates {
        return None;
    }
    if ev.has("agreement") && !ev.estate_strong() && !ev.has("trust") {
        return Some(Category::Contract);
    }
    if !ev.estate_strong() && ev.hits(Category::RealEstate) >= 2 {
        return Some(Category::RealEstate);
    }
    None
}

/// Criminal Procedure with injury terms but no strong criminal marker
/// (ignoring the generic word "defendant") is really Personal Injury.
fn criminal_vs_personal_injury(ev: &Evidence, cat: Category) -> Option<Category> {
    if cat == Category::CriminalProcedure
        && ev.hits(Category::PersonalInjury) > 0
        && !ev.criminal_strong()
    {
        return Some(Category::PersonalInjury);
    }
    None
}

/// Real Estate with zero real-estate hits but a strong estate marker belongs
/// to Wills/Trusts/Estates; "bequeath" alone forces the move regardless of
/// hit count.
fn real_estate_vs_estate(ev: &Evidence, cat: Category) -> Option<Category> {
    if cat != Category::RealEstate {
        return None;
    }
    if ev.has("bequeath") {
        return Some(Category::WillsTrustsEstates);
    }
    if ev.hits(Category::RealEstate) == 0 && ev.estate_strong() {
        return Some(Category::WillsTrustsEstates);
    }
    None
}

/// Any category: a strong estate marker wins outright. Runs last, so it
/// overrides everything above it.
fn global_estate_override(ev: &Evidence, cat: Category) -> Option<Category> {
    if cat != Category::WillsTrustsEstates && ev.estate_strong() {
        return Some(Category::WillsTrustsEstates);
    }
    None
}
