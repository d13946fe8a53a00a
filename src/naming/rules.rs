//! @acp:module "Naming Rule Engine"
//! @acp:summary "Derive canonical names and check actual names against them"
//! @acp:domain core
//! @acp:layer logic

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::words::{capitalize, decapitalize, split_words, to_pascal_case};
use super::{NamingConfig, OperationDescriptor, PathParamOrder};
use crate::error::{ConformError, Result};
use crate::path::extract_path_placeholders;
use crate::report::ValidationResult;
use crate::signature::{canonical_signature, classify, signature_violations, ParsedParameter};

static DEFAULT_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+$").expect("version pattern is valid"));

static PLACEHOLDER_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("placeholder pattern is valid"));

/// Type shown for the trailing variadic options parameter
pub const OPTIONS_PARAMETER: &str = "...options: RequestOption[]";

/// @acp:summary "Compiled naming rules"
#[derive(Debug, Clone)]
pub struct NamingRules {
    stop_words: Vec<String>,
    version_pattern: Regex,
    path_param_order: PathParamOrder,
}

impl Default for NamingRules {
    fn default() -> Self {
        let config = NamingConfig::default();
        Self {
            stop_words: config.stop_words,
            version_pattern: DEFAULT_VERSION_PATTERN.clone(),
            path_param_order: config.path_param_order,
        }
    }
}

/// @acp:summary "Every name derived for one operation"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedNames {
    pub method_name: String,
    pub request_type: String,
    pub response_type: String,
    pub parameter_signature: String,
}

/// @acp:summary "Value-level view of an actual call argument"
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A callable taking `arity` parameters
    Function { arity: usize },
    /// Any plain value
    Value(serde_json::Value),
}

impl ArgValue {
    /// Unary functions are request options, not payload
    pub fn is_option_like(&self) -> bool {
        matches!(self, ArgValue::Function { arity: 1 })
    }
}

impl NamingRules {
    pub fn new(config: &NamingConfig) -> Result<Self> {
        let version_pattern = Regex::new(&config.version_pattern).map_err(|e| {
            ConformError::InvalidConfig(format!(
                "versionPattern \"{}\": {}",
                config.version_pattern, e
            ))
        })?;

        Ok(Self {
            stop_words: config
                .stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            version_pattern,
            path_param_order: config.path_param_order,
        })
    }

    pub fn path_param_order(&self) -> PathParamOrder {
        self.path_param_order
    }

    /// PascalCase resource name built from the path's literal segments
    ///
    /// Returns an empty string for `/` or paths made only of placeholders,
    /// stop words and version segments.
    pub fn derive_resource_name(&self, path: &str) -> String {
        let stripped = PLACEHOLDER_STRIP.replace_all(path, "");
        stripped
            .split('/')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| !self.stop_words.contains(&segment.to_lowercase()))
            .filter(|segment| !self.version_pattern.is_match(segment))
            .flat_map(split_words)
            .map(|word| capitalize(&word))
            .collect()
    }

    /// Path parameter names used for the `By...` suffix, in the configured order
    pub fn suffix_parameters(&self, op: &OperationDescriptor) -> Vec<String> {
        let declared: Vec<&str> = op.path_parameters().map(|p| p.name.as_str()).collect();

        match self.path_param_order {
            PathParamOrder::Declared => declared.iter().map(|s| s.to_string()).collect(),
            PathParamOrder::Path => {
                let mut ordered: Vec<String> = Vec::new();
                for placeholder in extract_path_placeholders(&op.path) {
                    if declared.contains(&placeholder.as_str()) && !ordered.contains(&placeholder)
                    {
                        ordered.push(placeholder);
                    }
                }
                // Declared path parameters without a placeholder keep their slot at the end
                for name in declared {
                    if !ordered.iter().any(|o| o == name) {
                        ordered.push(name.to_string());
                    }
                }
                ordered
            }
        }
    }

    /// @acp:summary "Canonical method name for an operation"
    pub fn derive_method_name(&self, op: &OperationDescriptor) -> String {
        let mut name = capitalize(op.http_method.name_prefix());
        name.push_str(&self.derive_resource_name(&op.path));

        let suffix = self.suffix_parameters(op);
        if !suffix.is_empty() {
            name.push_str("By");
            for param in &suffix {
                name.push_str(&to_pascal_case(param));
            }
        }

        decapitalize(&name)
    }

    /// Canonical parameter list used in human-facing messages
    ///
    /// One `string` parameter per placeholder, a `request` parameter for
    /// body-carrying methods, and the trailing options parameter.
    pub fn derive_parameter_signature(&self, op: &OperationDescriptor) -> String {
        let mut params: Vec<String> = extract_path_placeholders(&op.path)
            .into_iter()
            .map(|name| format!("{}: string", name))
            .collect();

        if op.http_method.carries_body() {
            let method_name = self.derive_method_name(op);
            params.push(format!("request: {}", derive_request_type_name(&method_name)));
        }

        params.push(OPTIONS_PARAMETER.to_string());
        params.join(", ")
    }

    pub fn derive_operation_names(&self, op: &OperationDescriptor) -> DerivedNames {
        let method_name = self.derive_method_name(op);
        DerivedNames {
            request_type: derive_request_type_name(&method_name),
            response_type: derive_response_type_name(&method_name),
            parameter_signature: self.derive_parameter_signature(op),
            method_name,
        }
    }

    /// Exact match of an actual method name against the derived one
    pub fn validate_method_name(&self, actual: &str, op: &OperationDescriptor) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let expected = self.derive_method_name(op);

        if actual != expected {
            result.error(format!(
                "Method name \"{}\" does not match expected \"{}\" for {} {}",
                actual, expected, op.http_method, op.path
            ));
            result.suggest(format!("Rename \"{}\" to \"{}\"", actual, expected));
            result.suggest(format!(
                "Check that the HTTP method ({}) and path ({}) are the intended ones",
                op.http_method, op.path
            ));
        }

        result
    }

    /// Count payload arguments against the minimum the operation needs
    pub fn validate_method_signature(
        &self,
        method_name: &str,
        op: &OperationDescriptor,
        actual_args: &[ArgValue],
    ) -> ValidationResult {
        let mut result = ValidationResult::valid();

        let provided = actual_args.iter().filter(|a| !a.is_option_like()).count();
        let mut expected = extract_path_placeholders(&op.path).len();
        if op.http_method.carries_body() {
            expected += 1;
        }

        if provided < expected {
            result.error(format!(
                "Method \"{}\" received {} argument(s) but {} {} requires at least {}",
                method_name, provided, op.http_method, op.path, expected
            ));
            result.suggest(format!(
                "Expected signature: {}({})",
                method_name,
                self.derive_parameter_signature(op)
            ));
        }

        result
    }

    /// Check a decorated method's parsed parameters against the calling convention
    ///
    /// Every violation becomes one error; the single suggestion is the
    /// canonical form the method should take.
    pub fn validate_parsed_signature(
        &self,
        method_name: &str,
        op: &OperationDescriptor,
        parameters: &[ParsedParameter],
    ) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let placeholders = extract_path_placeholders(&op.path);
        let classified = classify(parameters, &placeholders);

        let violations = signature_violations(&classified);
        if violations.is_empty() {
            return result;
        }
        for violation in violations {
            result.error(violation);
        }

        let request_type = derive_request_type_name(method_name);
        let wants_request = op.http_method.carries_body() || classified.non_options_count() > 0;
        result.suggest(canonical_signature(
            method_name,
            wants_request.then_some(request_type.as_str()),
        ));
        result
    }
}

pub fn derive_request_type_name(method_name: &str) -> String {
    format!("{}Request", capitalize(method_name))
}

pub fn derive_response_type_name(method_name: &str) -> String {
    format!("{}Response", capitalize(method_name))
}

/// Independent exact-match checks of both type names
pub fn validate_type_names(
    method_name: &str,
    request_type_actual: &str,
    response_type_actual: &str,
) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let checks = [
        ("Request", derive_request_type_name(method_name), request_type_actual),
        ("Response", derive_response_type_name(method_name), response_type_actual),
    ];
    for (kind, expected, actual) in checks {
        if actual != expected {
            result.error(format!(
                "{} type \"{}\" for method \"{}\" should be named \"{}\"",
                kind, actual, method_name, expected
            ));
            result.suggest(format!("Rename type \"{}\" to \"{}\"", actual, expected));
        }
    }

    result
}

/// [`NamingRules::derive_method_name`] with the default rules
pub fn derive_method_name(op: &OperationDescriptor) -> String {
    NamingRules::default().derive_method_name(op)
}

pub fn derive_parameter_signature(op: &OperationDescriptor) -> String {
    NamingRules::default().derive_parameter_signature(op)
}

pub fn derive_operation_names(op: &OperationDescriptor) -> DerivedNames {
    NamingRules::default().derive_operation_names(op)
}

pub fn validate_method_name(actual: &str, op: &OperationDescriptor) -> ValidationResult {
    NamingRules::default().validate_method_name(actual, op)
}

pub fn validate_method_signature(
    method_name: &str,
    op: &OperationDescriptor,
    actual_args: &[ArgValue],
) -> ValidationResult {
    NamingRules::default().validate_method_signature(method_name, op, actual_args)
}
