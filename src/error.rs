//! @acp:module "Errors"
//! @acp:summary "Fail-fast error taxonomy for declaration and resolution"
//! @acp:domain core
//! @acp:layer model
//!
//! Only declaration-time and resolution-time failures are errors. Audits
//! report through [`crate::compliance::ValidationResult`] and never fail.

use thiserror::Error;

/// @acp:summary "Result alias used across the library"
pub type Result<T> = std::result::Result<T, ConformError>;

/// @acp:summary "Every fatal condition the library can raise"
#[derive(Debug, Error)]
pub enum ConformError {
    /// Path template breaks one of the format rules
    #[error(
        "[conform:path] Invalid path template \"{path}\"\n  - {reason}\n  Suggested path: \"{suggestion}\""
    )]
    MalformedPath {
        path: String,
        reason: String,
        suggestion: String,
    },

    /// Decorated method signature does not follow the calling convention
    #[error(
        "[conform:signature] Method \"{method}\" has an invalid signature\n{}\n  Expected: {canonical}",
        format_lines(.violations)
    )]
    SignatureViolation {
        method: String,
        violations: Vec<String>,
        canonical: String,
    },

    /// Placeholders left over after path-parameter substitution
    #[error(
        "[conform:uri] Missing path parameters for \"{path}\": {}\n  Bind each one with uri::with_path_param(name, value)",
        .missing.join(", ")
    )]
    MissingPathParameter { path: String, missing: Vec<String> },

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Class {class} has no recorded method {method}")]
    UnknownMethod { class: String, method: String },

    #[error("Annotation applied to an unsupported target: {0}")]
    UnsupportedTarget(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("  - {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
