//! @acp:module "Naming Rules"
//! @acp:summary "Canonical method/type names derived from HTTP operation descriptors"
//! @acp:domain core
//! @acp:layer logic
//!
//! # Naming Rule Engine
//!
//! Maps an [`OperationDescriptor`] to the identifiers a client method and its
//! request/response types must carry, and checks actual identifiers against
//! them.
//!
//! ## Method name derivation
//!
//! 1. **Prefix** from the HTTP method (`post` -> `create`, `put` -> `update`)
//! 2. **Resource** from the path: placeholders, empty segments, stop words
//!    and version segments (`v1`) are dropped; the rest is PascalCased
//! 3. **Suffix** `By<Param>...` when the operation has path parameters
//! 4. **camelCase** the result by lowering the first character
//!
//! `GET /api/users/{id}` therefore becomes `getUsersById`.

pub mod rules;
pub mod words;

pub use rules::{
    derive_method_name, derive_operation_names, derive_parameter_signature,
    derive_request_type_name, derive_response_type_name, validate_method_name,
    validate_method_signature, validate_type_names, ArgValue, DerivedNames, NamingRules,
};
pub use words::{split_words, split_words_acronym, to_pascal_case};

pub use crate::path::extract_path_placeholders;

use serde::{Deserialize, Serialize};

use crate::registry::MethodMetadata;

/// @acp:summary "HTTP method of an operation"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    /// Any other verb, stored lower-cased
    Other(String),
}

impl HttpMethod {
    /// Lower-case verb
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Other(verb) => verb,
        }
    }

    /// Method-name prefix; unknown verbs pass through lower-cased
    pub fn name_prefix(&self) -> &str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "create",
            HttpMethod::Put => "update",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Other(verb) => verb,
        }
    }

    /// Whether requests conventionally carry a body
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl From<&str> for HttpMethod {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "get" => HttpMethod::Get,
            "post" => HttpMethod::Post,
            "put" => HttpMethod::Put,
            "delete" => HttpMethod::Delete,
            "patch" => HttpMethod::Patch,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl From<String> for HttpMethod {
    fn from(s: String) -> Self {
        HttpMethod::from(s.as_str())
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(HttpMethod::from(s))
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// @acp:summary "Where an operation parameter travels"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
}

fn default_param_type() -> String {
    "string".to_string()
}

/// @acp:summary "One declared operation parameter"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(rename = "type", default = "default_param_type")]
    pub r#type: String,
}

impl ParameterDescriptor {
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            r#type: default_param_type(),
        }
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Query,
            r#type: default_param_type(),
        }
    }
}

/// @acp:summary "Declarative description of one HTTP endpoint"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "method")]
    pub http_method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl OperationDescriptor {
    pub fn new(http_method: impl Into<HttpMethod>, path: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            http_method: http_method.into(),
            path: path.into(),
            summary: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Rebuild a descriptor from stored metadata
    ///
    /// Path parameters follow the placeholder order of the path and are
    /// string-typed; repeated placeholders are declared once.
    pub fn from_metadata(metadata: &MethodMetadata) -> Self {
        let mut op = OperationDescriptor::new(metadata.http_method.clone(), metadata.path.clone())
            .with_name(metadata.name.clone());
        op.summary = metadata.options.summary.clone();

        for placeholder in extract_path_placeholders(&metadata.path) {
            if !op.parameters.iter().any(|p| p.name == placeholder) {
                op.parameters.push(ParameterDescriptor::path(placeholder));
            }
        }
        op
    }

    /// Path-located parameters in declaration order
    pub fn path_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
    }
}

/// @acp:summary "Order used for the `By...` method-name suffix"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathParamOrder {
    /// Order of the operation's own parameter list (not re-sorted)
    #[default]
    Declared,
    /// Order in which placeholders appear in the path string
    Path,
}

fn default_stop_words() -> Vec<String> {
    vec!["api".to_string()]
}

fn default_version_pattern() -> String {
    r"^v\d+$".to_string()
}

/// @acp:summary "Tunable inputs of the naming rules"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingConfig {
    /// Path segments dropped from resource names (case-insensitive)
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Segments matching this pattern are treated as API versions and dropped
    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,

    #[serde(default)]
    pub path_param_order: PathParamOrder,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            version_pattern: default_version_pattern(),
            path_param_order: PathParamOrder::default(),
        }
    }
}
