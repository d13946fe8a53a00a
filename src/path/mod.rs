//! @acp:module "Path Templates"
//! @acp:summary "Path template format rules and placeholder extraction"
//! @acp:domain core
//! @acp:layer logic
//!
//! A path template is valid when it:
//! 1. is non-empty
//! 2. starts with `/`
//! 3. contains no `//`
//! 4. does not end with `/` (unless it is exactly `/`)

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConformError, Result};

/// Matches `{name}` placeholders; group 1 is the name without braces
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// @acp:summary "Which format rule a path broke"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRule {
    NonEmpty,
    LeadingSlash,
    NoDoubleSlash,
    NoTrailingSlash,
}

impl PathRule {
    pub fn describe(&self) -> &'static str {
        match self {
            PathRule::NonEmpty => "Path must not be empty",
            PathRule::LeadingSlash => "Path must start with '/'",
            PathRule::NoDoubleSlash => "Path must not contain '//'",
            PathRule::NoTrailingSlash => "Path must not end with '/' (except the root path '/')",
        }
    }
}

/// @acp:summary "Outcome of checking a path template"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCheck {
    pub violation: Option<PathRule>,
    pub suggestion: String,
}

impl PathCheck {
    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }
}

/// Check a path against the format rules, reporting the first rule broken
pub fn validate_path(path: &str) -> PathCheck {
    let violation = if path.is_empty() {
        Some(PathRule::NonEmpty)
    } else if !path.starts_with('/') {
        Some(PathRule::LeadingSlash)
    } else if path.contains("//") {
        Some(PathRule::NoDoubleSlash)
    } else if path.len() > 1 && path.ends_with('/') {
        Some(PathRule::NoTrailingSlash)
    } else {
        None
    };

    PathCheck {
        violation,
        suggestion: suggest_path(path),
    }
}

pub fn is_valid_path(path: &str) -> bool {
    validate_path(path).is_valid()
}

/// Validate a path and turn a violation into a declaration-time error
pub fn ensure_valid_path(path: &str) -> Result<()> {
    let check = validate_path(path);
    match check.violation {
        None => Ok(()),
        Some(rule) => Err(ConformError::MalformedPath {
            path: path.to_string(),
            reason: rule.describe().to_string(),
            suggestion: check.suggestion,
        }),
    }
}

/// Produce the closest valid form of a path
///
/// Empty segments are dropped, so `//` collapses and trailing slashes vanish.
pub fn suggest_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// All `{...}` placeholder names in left-to-right order, duplicates kept
pub fn extract_path_placeholders(path: &str) -> Vec<String> {
    PLACEHOLDER_PATTERN
        .captures_iter(path)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether a segment is a single `{name}` placeholder
pub fn is_placeholder_segment(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}
