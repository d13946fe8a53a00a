//! @acp:module "Fuzzy Diagnostics"
//! @acp:summary "Similarity heuristics that suggest the type a developer probably meant"
//! @acp:domain core
//! @acp:layer analysis
//!
//! Advisory only: nothing here blocks a declaration. A candidate is
//! "related" to an operation when any of these holds, checked in order:
//!
//! 1. Case-insensitive normalized Levenshtein similarity above 0.6
//! 2. At least one shared word longer than 2 characters (acronym-aware split),
//!    ignoring verb prefixes and the `Request`/`Response` suffixes
//! 3. The candidate contains the operation's resource token, or vice versa

use serde::Serialize;

use crate::naming::split_words_acronym;

/// Similarity above which two names count as related
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Words must be longer than this to count as shared
pub const MIN_WORD_LEN: usize = 2;

/// Words every method or type name carries; sharing one says nothing
const CONVENTION_WORDS: &[&str] = &[
    "get", "create", "update", "delete", "patch", "request", "response",
];

/// @acp:summary "Why a candidate was considered related"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MatchSignal {
    Similarity { score: f64 },
    SharedWords { words: Vec<String> },
    ResourceToken { token: String },
}

impl std::fmt::Display for MatchSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSignal::Similarity { score } => write!(f, "{:.0}% similar", score * 100.0),
            MatchSignal::SharedWords { words } => write!(f, "shares {}", words.join(", ")),
            MatchSignal::ResourceToken { token } => write!(f, "mentions {}", token),
        }
    }
}

/// @acp:summary "A related candidate with its ranking score"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMatch {
    pub candidate: String,
    pub signal: MatchSignal,
    /// Normalized similarity, used for ranking
    pub score: f64,
}

/// Case-insensitive normalized Levenshtein similarity in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Lower-cased, de-duplicated words longer than [`MIN_WORD_LEN`]
pub fn significant_words(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in split_words_acronym(name) {
        let word = word.to_lowercase();
        if word.chars().count() > MIN_WORD_LEN && !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

/// Significant words of `a` also in `b`, minus verb prefixes and type suffixes
pub fn shared_words(a: &str, b: &str) -> Vec<String> {
    let theirs = significant_words(b);
    significant_words(a)
        .into_iter()
        .filter(|w| theirs.contains(w) && !CONVENTION_WORDS.contains(&w.as_str()))
        .collect()
}

/// Resource token of a method name: everything after the leading verb word
pub fn resource_token(method_name: &str) -> Option<String> {
    let words = split_words_acronym(method_name);
    let token: String = words.iter().skip(1).map(String::as_str).collect();
    (token.chars().count() > MIN_WORD_LEN).then_some(token)
}

/// @acp:summary "Check the three relatedness signals in order"
pub fn relate(candidate: &str, operation_name: &str) -> Option<MatchSignal> {
    let score = similarity(candidate, operation_name);
    if score > SIMILARITY_THRESHOLD {
        return Some(MatchSignal::Similarity { score });
    }

    let words = shared_words(candidate, operation_name);
    if !words.is_empty() {
        return Some(MatchSignal::SharedWords { words });
    }

    let token = resource_token(operation_name)?;
    let (cand, tok) = (candidate.to_lowercase(), token.to_lowercase());
    if cand.contains(&tok) || tok.contains(&cand) {
        return Some(MatchSignal::ResourceToken { token });
    }

    None
}

/// Related candidates, best first
///
/// Only candidates ending with `suffix` (e.g. `Response`) are considered;
/// pass `""` to consider all of them.
pub fn find_related<'a>(
    operation_name: &str,
    suffix: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<FuzzyMatch> {
    let mut matches: Vec<FuzzyMatch> = candidates
        .into_iter()
        .filter(|c| c.ends_with(suffix))
        .filter_map(|candidate| {
            relate(candidate, operation_name).map(|signal| FuzzyMatch {
                candidate: candidate.to_string(),
                score: similarity(candidate, operation_name),
                signal,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });
    matches
}
