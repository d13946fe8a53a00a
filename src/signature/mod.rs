//! @acp:module "Signature Inspector"
//! @acp:summary "Extract and classify a callable's formal parameters from its source text"
//! @acp:domain core
//! @acp:layer parser
//!
//! # Signature Inspection
//!
//! Given the printable source of a method (`getUser(request: GetUserRequest,
//! ...options: RequestOption[]) { ... }`), the inspector:
//!
//! 1. **Locates** the top-level parameter list (or the single bare parameter
//!    of an arrow function)
//! 2. **Splits** it on top-level commas with the [`scanner`]
//! 3. **Parses** each raw parameter into name, declared type and rest flag
//! 4. **Classifies** parameters against the path's placeholder names
//!
//! A callable without retrievable source is [`SignatureInspection::Indeterminate`];
//! callers treat that as "no opinion" and skip the check.

pub mod scanner;

pub use scanner::{find_top_level, split_top_level, ScanEvent, ScanState, Scanner};

use serde::Serialize;

/// @acp:summary "One formal parameter as written in source"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedParameter {
    pub raw_text: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    pub is_rest: bool,
}

/// @acp:summary "Result of inspecting a callable"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureInspection {
    Parsed(Vec<ParsedParameter>),
    /// Source not available yet; validation is deferred
    Indeterminate,
}

impl SignatureInspection {
    pub fn parameters(&self) -> Option<&[ParsedParameter]> {
        match self {
            SignatureInspection::Parsed(params) => Some(params),
            SignatureInspection::Indeterminate => None,
        }
    }
}

/// @acp:summary "Parameters partitioned by role"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParameters {
    /// Placeholders written as positional parameters (always an error)
    pub path_params_in_signature: Vec<ParsedParameter>,
    pub request_candidates: Vec<ParsedParameter>,
    pub options_candidates: Vec<ParsedParameter>,
}

impl ClassifiedParameters {
    /// Everything that is not a rest/options parameter
    pub fn non_options_count(&self) -> usize {
        self.path_params_in_signature.len() + self.request_candidates.len()
    }
}

/// @acp:summary "Inspect callable source; `None` means not yet defined"
pub fn inspect(source: Option<&str>) -> SignatureInspection {
    let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) else {
        return SignatureInspection::Indeterminate;
    };

    match extract_parameter_text(source) {
        Some(text) => SignatureInspection::Parsed(parse_parameter_list(text)),
        None => {
            tracing::debug!("No parameter list found in callable source");
            SignatureInspection::Indeterminate
        }
    }
}

/// Text between the parentheses of the first top-level parameter list
///
/// Also accepts a bare arrow parameter (`options => ...`).
pub fn extract_parameter_text(source: &str) -> Option<&str> {
    let mut events = Scanner::new(source).peekable();
    let mut open = None;

    while let Some(event) = events.next() {
        if !event.is_top_level() {
            continue;
        }
        if event.ch == '(' {
            open = Some(event.index);
            break;
        }
        if event.ch == '=' && events.peek().is_some_and(|next| next.ch == '>') {
            let head = source[..event.index].trim();
            let head = head.strip_prefix("async ").unwrap_or(head).trim();
            return Some(head);
        }
    }

    let open = open?;
    let close = events
        .find(|event| event.is_top_level() && event.ch == ')')?
        .index;
    Some(&source[open + 1..close])
}

/// Split a raw parameter list and parse each entry
pub fn parse_parameter_list(text: &str) -> Vec<ParsedParameter> {
    split_top_level(text, ',')
        .into_iter()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_parameter)
        .collect()
}

/// Parse one raw parameter such as `...options: RequestOption[]`
pub fn parse_parameter(raw: &str) -> ParsedParameter {
    let raw = raw.trim();
    let is_rest = raw.starts_with("...");
    let body = raw.trim_start_matches("...");

    // Default values are not part of the name or the type
    let without_default = match find_top_level(body, '=') {
        Some(idx) if !body[idx..].starts_with("=>") => &body[..idx],
        _ => body,
    };

    let (name_part, declared_type) = match find_top_level(without_default, ':') {
        Some(idx) => (
            &without_default[..idx],
            Some(without_default[idx + 1..].trim().to_string()).filter(|t| !t.is_empty()),
        ),
        None => (without_default, None),
    };

    let name = name_part.trim().trim_end_matches('?').trim().to_string();

    ParsedParameter {
        raw_text: raw.to_string(),
        name,
        declared_type,
        is_rest,
    }
}

/// Partition parameters by rest flag and placeholder names
pub fn classify(parameters: &[ParsedParameter], placeholders: &[String]) -> ClassifiedParameters {
    let mut classified = ClassifiedParameters::default();

    for param in parameters {
        if param.is_rest {
            classified.options_candidates.push(param.clone());
        } else if placeholders.iter().any(|p| *p == param.name) {
            classified.path_params_in_signature.push(param.clone());
        } else {
            classified.request_candidates.push(param.clone());
        }
    }

    classified
}

/// Every calling-convention violation in a classified parameter list
pub fn signature_violations(classified: &ClassifiedParameters) -> Vec<String> {
    let mut violations = Vec::new();

    for param in &classified.path_params_in_signature {
        violations.push(format!(
            "Path parameter \"{name}\" must not be a positional argument; bind it with uri::with_path_param(\"{name}\", value) in the options instead",
            name = param.name
        ));
    }

    if classified.request_candidates.len() > 1 {
        violations.push(format!(
            "Found {} request parameters ({}); combine them into one request object",
            classified.request_candidates.len(),
            names(&classified.request_candidates)
        ));
    }

    if classified.options_candidates.len() > 1 {
        violations.push(format!(
            "Found {} rest parameters ({}); only one trailing options parameter is allowed",
            classified.options_candidates.len(),
            names(&classified.options_candidates)
        ));
    }

    let non_options = classified.non_options_count();
    if non_options > 1 {
        violations.push(format!(
            "Too many parameters before the options: found {}, expected at most 1",
            non_options
        ));
    }

    violations
}

/// Canonical calling form used in error messages
pub fn canonical_signature(method_name: &str, request_type: Option<&str>) -> String {
    let options = crate::naming::rules::OPTIONS_PARAMETER;
    match request_type {
        Some(request_type) => format!("{}(request: {}, {})", method_name, request_type, options),
        None => format!("{}({})", method_name, options),
    }
}

fn names(params: &[ParsedParameter]) -> String {
    params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
