//! @acp:module "Word Splitting"
//! @acp:summary "Identifier word splitting and case joining"
//! @acp:domain core
//! @acp:layer utility
//!
//! Two splitters exist. [`split_words`] breaks only on separators and on a
//! lowercase-to-uppercase transition (`systemId` -> `system`, `Id`), which is
//! what name derivation needs. [`split_words_acronym`] additionally splits at
//! the end of an uppercase run (`HTTPSClient` -> `HTTPS`, `Client`) for fuzzy
//! word matching.

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | ' ' | '.' | '/')
}

/// Split on `-`, `_` and lowercase-to-uppercase transitions
pub fn split_words(s: &str) -> Vec<String> {
    split_with(s, false)
}

/// Split like [`split_words`] and also break acronym runs
pub fn split_words_acronym(s: &str) -> Vec<String> {
    split_with(s, true)
}

fn split_with(s: &str, acronyms: bool) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let lower_to_upper = prev.is_lowercase() || prev.is_ascii_digit();
            let acronym_end = acronyms && prev.is_uppercase() && next_lower;
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Uppercase the first character, keep the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase only the first character
pub fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Re-join the words of an identifier in PascalCase
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}
