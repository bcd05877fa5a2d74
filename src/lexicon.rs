//! Keyword lexicons: per-category trigger terms, strong markers, and the
//! generic "looks legal at all" signal set.
//!
//! The word lists are configuration data (`config/lexicons.toml`), loaded at
//! startup with an embedded default as fallback, an env-var path override,
//! and a dev-gated hot-reload watcher. Matching is token-boundary aware so
//! the estate term `will` never fires on the modal verb inside `willing`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};

use serde::Deserialize;
use tracing::info;

use crate::category::Category;

pub const DEFAULT_LEXICONS_CONFIG_PATH: &str = "config/lexicons.toml";
pub const ENV_LEXICONS_CONFIG_PATH: &str = "LEXICONS_CONFIG_PATH";

/// Shipped defaults; used when no config file is present on disk.
const DEFAULT_LEXICONS_TOML: &str = include_str!("../config/lexicons.toml");

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconRoot {
    pub signals: SignalSection,
    pub categories: CategorySections,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalSection {
    /// Generic legal-signal terms used by the fast-path gate.
    pub legal: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySections {
    pub contract: TermSet,
    pub wills_trusts_estates: TermSet,
    pub criminal_procedure: TermSet,
    pub real_estate: TermSet,
    pub employment_law: TermSet,
    pub personal_injury: TermSet,
    pub family_law: TermSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TermSet {
    pub terms: Vec<String>,
    /// Decisive markers that outrank generic hit counts.
    #[serde(default)]
    pub strong: Vec<String>,
}

/* ----------------------------
Compiled engine
---------------------------- */

#[derive(Debug, Default)]
struct CompiledSet {
    terms: Vec<String>,
    strong: Vec<String>,
}

/// Read-only keyword engine shared across requests.
#[derive(Debug)]
pub struct LexiconEngine {
    signals: Vec<String>,
    sets: HashMap<Category, CompiledSet>,
}

impl LexiconEngine {
    /// Load from disk. Uses LEXICONS_CONFIG_PATH or the default path; falls
    /// back to the embedded defaults when the file is missing or unreadable.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_LEXICONS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LEXICONS_CONFIG_PATH));

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(_) => Self::from_toml_str(DEFAULT_LEXICONS_TOML),
        }
    }

    /// Build from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: LexiconRoot = toml::from_str(toml_str)?;
        let mut sets = HashMap::new();
        let c = &root.categories;
        sets.insert(Category::Contract, compile(&c.contract));
        sets.insert(Category::WillsTrustsEstates, compile(&c.wills_trusts_estates));
        sets.insert(Category::CriminalProcedure, compile(&c.criminal_procedure));
        sets.insert(Category::RealEstate, compile(&c.real_estate));
        sets.insert(Category::EmploymentLaw, compile(&c.employment_law));
        sets.insert(Category::PersonalInjury, compile(&c.personal_injury));
        sets.insert(Category::FamilyLaw, compile(&c.family_law));
        Ok(Self {
            signals: root.signals.legal.iter().map(|t| normalize(t)).collect(),
            sets,
        })
    }

    /// True if the text contains any generic legal-signal term.
    pub fn has_legal_signal(&self, text: &str) -> bool {
        let padded = pad(text);
        self.signals.iter().any(|t| padded_contains(&padded, t))
    }

    /// Count of distinct lexicon terms of `cat` present in `text`.
    pub fn hits(&self, cat: Category, text: &str) -> usize {
        let padded = pad(text);
        self.sets
            .get(&cat)
            .map(|s| s.terms.iter().filter(|t| padded_contains(&padded, t)).count())
            .unwrap_or(0)
    }

    /// True if any strong marker of `cat` is present in `text`.
    pub fn has_strong(&self, cat: Category, text: &str) -> bool {
        let padded = pad(text);
        self.sets
            .get(&cat)
            .map(|s| s.strong.iter().any(|t| padded_contains(&padded, t)))
            .unwrap_or(false)
    }

    /// Best-effort category from keyword evidence alone: first category in
    /// priority order with at least one lexicon hit.
    pub fn keyword_guess(&self, text: &str) -> Option<Category> {
        Category::NAMED_PRIORITY
            .into_iter()
            .find(|&cat| self.hits(cat, text) > 0)
    }
}

fn compile(set: &TermSet) -> CompiledSet {
    CompiledSet {
        terms: set.terms.iter().map(|t| normalize(t)).collect(),
        strong: set.strong.iter().map(|t| normalize(t)).collect(),
    }
}

/// Lowercase and collapse every non-alphanumeric run to a single space, so
/// `"Plaintiff,"` matches the term `plaintiff` and phrases match across
/// punctuation.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = true;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_space = false;
        } else if !last_space {
            out.push(' ');
            last_space = true;
        }
    }
    out.trim_end().to_string()
}

fn pad(text: &str) -> String {
    format!(" {} ", normalize(text))
}

fn padded_contains(padded: &str, norm_term: &str) -> bool {
    !norm_term.is_empty() && padded.contains(&format!(" {norm_term} "))
}

/// Token-boundary presence check for a single term or phrase.
pub fn term_present(text: &str, term: &str) -> bool {
    padded_contains(&pad(text), &normalize(term))
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle that can hot-reload the underlying engine in dev/local.
/// - Enable by setting LEXICONS_HOT_RELOAD=1
/// - Dev-gated: active only if cfg!(debug_assertions) OR SHUTTLE_ENV is "local"/"development".
#[derive(Clone)]
pub struct LexiconHandle {
    inner: Arc<RwLock<LexiconEngine>>,
}

impl LexiconHandle {
    pub fn new(engine: LexiconEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// Run `f` against the current engine snapshot.
    pub fn with<R>(&self, f: impl FnOnce(&LexiconEngine) -> R) -> R {
        let guard = self.inner.read().expect("lexicon lock poisoned");
        f(&guard)
    }
}

fn hot_reload_enabled() -> bool {
    let want = std::env::var("LEXICONS_HOT_RELOAD")
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Start a simple polling watcher on `path` to hot-reload into `handle.inner`.
/// Polls mtime every 2s. Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: LexiconHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            if let Ok(mtime) = fs::metadata(&path).and_then(|m| m.modified()) {
                let changed = match last_mtime {
                    None => {
                        last_mtime = Some(mtime);
                        false
                    }
                    Some(prev) => mtime > prev,
                };
                if changed {
                    if let Ok(content) = fs::read_to_string(&path) {
                        if let Ok(fresh) = LexiconEngine::from_toml_str(&content) {
                            if let Ok(mut guard) = handle.inner.write() {
                                *guard = fresh;
                                info!(path = %path.display(), "lexicons reloaded");
                            }
                        }
                    }
                    last_mtime = Some(mtime);
                }
            }
            thread::sleep(poll);
        }
    });
}
