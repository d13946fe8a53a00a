//! @acp:module "Validation Report"
//! @acp:summary "Uniform result shape for every validation and audit"
//! @acp:domain core
//! @acp:layer model

use serde::{Deserialize, Serialize};

/// @acp:summary "Outcome of a validation: errors block, suggestions advise"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn suggest(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.suggestions.extend(other.suggestions);
    }
}
