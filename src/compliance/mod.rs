//! @acp:module "Compliance Audit"
//! @acp:summary "Non-fatal audit of a class's registered operations against the naming rules"
//! @acp:domain core
//! @acp:layer service
//!
//! # Audits
//!
//! [`check_compliance`] reads every [`MethodMetadata`] recorded for a class
//! and re-derives what each method should look like. Findings are collected
//! into one [`ValidationResult`]; nothing here returns an error, so a tool
//! can batch-report across a whole registry.
//!
//! Each concern is toggled independently through [`CheckOptions`]:
//!
//! | Option                      | Checks                                          |
//! |-----------------------------|-------------------------------------------------|
//! | `enableNamingValidation`    | method name equals the derived name             |
//! | `enableTypeValidation`      | request/response types exist in the module      |
//! | `enableParameterValidation` | member signature follows the calling convention |
//! | `enableRootUriCheck`        | the class (or an ancestor) has a root URI       |
//! | `requireDocumentation`      | every method has a summary or description       |

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::fuzzy::find_related;
use crate::naming::{
    derive_request_type_name, derive_response_type_name, NamingRules, OperationDescriptor,
};
use crate::registry::{ClassId, ClientRegistry, MethodMetadata};
use crate::signature::{inspect, SignatureInspection};

pub use crate::report::ValidationResult;

fn default_true() -> bool {
    true
}

/// @acp:summary "Namespace of type names the type check searches"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleContext {
    pub types: IndexSet<String>,
}

impl ModuleContext {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains(name)
    }
}

/// @acp:summary "Audit toggles"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOptions {
    #[serde(default = "default_true")]
    pub enable_naming_validation: bool,

    #[serde(default = "default_true")]
    pub enable_type_validation: bool,

    #[serde(default = "default_true")]
    pub enable_parameter_validation: bool,

    #[serde(default = "default_true")]
    pub enable_root_uri_check: bool,

    #[serde(default)]
    pub require_documentation: bool,

    /// Supplied per audit, never read from config files
    #[serde(skip)]
    pub module_context: Option<ModuleContext>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            enable_naming_validation: true,
            enable_type_validation: true,
            enable_parameter_validation: true,
            enable_root_uri_check: true,
            require_documentation: false,
            module_context: None,
        }
    }
}

impl CheckOptions {
    pub fn with_module_context(mut self, context: ModuleContext) -> Self {
        self.module_context = Some(context);
        self
    }
}

/// @acp:summary "Audit one class with the default naming rules"
pub fn check_compliance(
    registry: &ClientRegistry,
    class: &ClassId,
    options: &CheckOptions,
) -> ValidationResult {
    check_compliance_with(registry, class, options, &NamingRules::default())
}

/// @acp:summary "Audit one class with explicit naming rules"
pub fn check_compliance_with(
    registry: &ClientRegistry,
    class: &ClassId,
    options: &CheckOptions,
    rules: &NamingRules,
) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if !registry.contains_class(class) {
        result.error(format!("Class {} has no recorded declarations", class));
        return result;
    }

    if options.enable_root_uri_check {
        result.merge(check_root_uri(registry, class));
    }

    let methods = registry.methods_metadata(class);
    // Exact type names owned by some method of this class never count as a mismatch
    let claimed: IndexSet<String> = methods
        .iter()
        .flat_map(expected_types)
        .map(|(_, type_name)| type_name)
        .collect();

    for metadata in methods {
        let op = OperationDescriptor::from_metadata(metadata);

        if options.enable_naming_validation {
            result.merge(rules.validate_method_name(&metadata.name, &op));
        }

        if options.enable_type_validation {
            if let Some(context) = &options.module_context {
                result.merge(check_types(metadata, context, &claimed));
            }
        }

        if options.enable_parameter_validation {
            result.merge(check_parameters(registry, class, metadata, &op, rules));
        }

        if options.require_documentation && !metadata.options.is_documented() {
            result.error(format!(
                "Method \"{}\" ({} {}) has no summary or description",
                metadata.name, metadata.http_method, metadata.path
            ));
            result.suggest(format!(
                "Pass a summary to the {} annotation of \"{}\"",
                metadata.http_method, metadata.name
            ));
        }
    }

    result
}

/// @acp:summary "Audit every class in the registry"
pub fn check_registry(
    registry: &ClientRegistry,
    options: &CheckOptions,
    rules: &NamingRules,
) -> IndexMap<ClassId, ValidationResult> {
    registry
        .classes()
        .map(|class| {
            (
                class.clone(),
                check_compliance_with(registry, class, options, rules),
            )
        })
        .collect()
}

fn check_root_uri(registry: &ClientRegistry, class: &ClassId) -> ValidationResult {
    let mut result = ValidationResult::valid();

    match registry.root_uri(class) {
        None => {
            result.error(format!("Class {} has no root URI", class));
            result.suggest(format!("Annotate {} with a root URI such as \"/api\"", class));
        }
        Some(uri) if uri.len() > 1 && uri.ends_with('/') => {
            result.suggest(format!(
                "Root URI \"{}\" of {} ends with '/'; use \"{}\"",
                uri,
                class,
                uri.trim_end_matches('/')
            ));
        }
        Some(_) => {}
    }

    result
}

/// Request type (body methods only) and response type a method should have
fn expected_types(metadata: &MethodMetadata) -> Vec<(&'static str, String)> {
    let mut expected = vec![("Response", derive_response_type_name(&metadata.name))];
    if metadata.http_method.carries_body() {
        expected.insert(0, ("Request", derive_request_type_name(&metadata.name)));
    }
    expected
}

/// Expected type names must exist; a related-but-different name is an error
fn check_types(
    metadata: &MethodMetadata,
    context: &ModuleContext,
    claimed: &IndexSet<String>,
) -> ValidationResult {
    let mut result = ValidationResult::valid();

    for (suffix, type_name) in expected_types(metadata) {
        if context.contains(&type_name) {
            continue;
        }

        let candidates = context
            .types
            .iter()
            .map(String::as_str)
            .filter(|candidate| !claimed.contains(*candidate));
        match find_related(&metadata.name, suffix, candidates).into_iter().next() {
            Some(found) => {
                result.error(format!(
                    "{} type of \"{}\" is \"{}\" but should be named \"{}\" ({})",
                    suffix, metadata.name, found.candidate, type_name, found.signal
                ));
                result.suggest(format!("Rename type \"{}\" to \"{}\"", found.candidate, type_name));
            }
            None => {
                result.suggest(format!(
                    "Type \"{}\" for method \"{}\" is missing from the module",
                    type_name, metadata.name
                ));
            }
        }
    }

    result
}

fn check_parameters(
    registry: &ClientRegistry,
    class: &ClassId,
    metadata: &MethodMetadata,
    op: &OperationDescriptor,
    rules: &NamingRules,
) -> ValidationResult {
    let source = registry
        .member(class, &metadata.name)
        .and_then(|callable| callable.source.as_deref());

    match inspect(source) {
        SignatureInspection::Parsed(params) => {
            rules.validate_parsed_signature(&metadata.name, op, &params)
        }
        SignatureInspection::Indeterminate => ValidationResult::valid(),
    }
}
