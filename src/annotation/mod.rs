//! @acp:module "Annotations"
//! @acp:summary "HTTP-method and root-URI annotations with declaration-time enforcement"
//! @acp:domain core
//! @acp:layer service
//! @acp:stability stable
//!
//! # Applying annotations
//!
//! An [`Annotator`] owns the [`ClientRegistry`] it writes to. Applying an
//! HTTP-method annotation:
//!
//! 1. **Normalizes** the runtime's arguments ([`protocol::normalize`])
//! 2. **Validates** the path template (fail fast)
//! 3. **Inspects** the decorated function's signature, if its source is known
//! 4. **Records** one [`MethodMetadata`] on the class, replacing any record
//!    with the same method name
//!
//! Steps 2 and 3 are skipped in [`ValidationMode::Disabled`]; metadata is
//! still recorded.
//!
//! ```rust
//! use conform::annotation::{get, legacy_args, Annotator};
//! use conform::registry::{Callable, ClassId};
//!
//! let mut annotator = Annotator::default();
//! let class = ClassId::new("UserApi");
//! let source = Callable::with_source("getUser(request: GetUserRequest, ...options) {}");
//!
//! let metadata = annotator.apply_http(&get("/users/{id}"), &legacy_args(&class, "getUser", source))?;
//! assert_eq!(metadata.name, "getUser");
//! # Ok::<(), conform::ConformError>(())
//! ```

pub mod protocol;

pub use protocol::{
    legacy_args, modern_args, normalize, AnnotationArg, ContextKind, DecoratorContext, Invocation,
    InvocationKind, PropertyDescriptor,
};

use crate::config::{Config, ValidationMode};
use crate::error::{ConformError, Result};
use crate::naming::{HttpMethod, NamingRules, OperationDescriptor};
use crate::path::ensure_valid_path;
use crate::registry::{Callable, ClientRegistry, MethodMetadata, MethodOptions};
use crate::signature::{inspect, SignatureInspection};

/// @acp:summary "An HTTP-method annotation with its arguments"
#[derive(Debug, Clone, PartialEq)]
pub struct HttpAnnotation {
    pub method: HttpMethod,
    pub path: String,
    pub options: MethodOptions,
}

impl HttpAnnotation {
    pub fn new(method: impl Into<HttpMethod>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            options: MethodOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MethodOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.options.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }
}

pub fn get(path: impl Into<String>) -> HttpAnnotation {
    HttpAnnotation::new(HttpMethod::Get, path)
}

pub fn post(path: impl Into<String>) -> HttpAnnotation {
    HttpAnnotation::new(HttpMethod::Post, path)
}

pub fn put(path: impl Into<String>) -> HttpAnnotation {
    HttpAnnotation::new(HttpMethod::Put, path)
}

pub fn delete(path: impl Into<String>) -> HttpAnnotation {
    HttpAnnotation::new(HttpMethod::Delete, path)
}

pub fn patch(path: impl Into<String>) -> HttpAnnotation {
    HttpAnnotation::new(HttpMethod::Patch, path)
}

/// @acp:summary "Class-level root URI annotation"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootUriAnnotation {
    pub uri: String,
}

pub fn root_uri(uri: impl Into<String>) -> RootUriAnnotation {
    RootUriAnnotation { uri: uri.into() }
}

/// @acp:summary "Applies annotations and owns the registry they write to"
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    registry: ClientRegistry,
    mode: ValidationMode,
    rules: NamingRules,
}

impl Annotator {
    pub fn new(mode: ValidationMode, rules: NamingRules) -> Self {
        Self {
            registry: ClientRegistry::new(),
            mode,
            rules,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.mode, config.naming_rules()?))
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.mode
    }

    /// Affects annotations applied from now on; recorded metadata is kept
    pub fn set_validation_mode(&mut self, mode: ValidationMode) {
        self.mode = mode;
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Declare classes and members before annotating them
    pub fn registry_mut(&mut self) -> &mut ClientRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> ClientRegistry {
        self.registry
    }

    /// @acp:summary "Apply an HTTP-method annotation to a method"
    pub fn apply_http(
        &mut self,
        annotation: &HttpAnnotation,
        args: &[AnnotationArg],
    ) -> Result<MethodMetadata> {
        let invocation = normalize(args)?;

        let method_name = match (&invocation.method_name, invocation.context_kind) {
            (Some(name), None | Some(ContextKind::Method | ContextKind::Field)) => name.clone(),
            (_, kind) => {
                return Err(ConformError::UnsupportedTarget(format!(
                    "{} {} must decorate a method or field, not {}",
                    annotation.method,
                    annotation.path,
                    match kind {
                        Some(ContextKind::Class) => "a class",
                        _ => "an unnamed target",
                    }
                )));
            }
        };

        if self.mode.is_strict() {
            ensure_valid_path(&annotation.path)?;
            let callable = self.locate_callable(&invocation, &method_name);
            self.check_signature(&method_name, annotation, callable.as_ref())?;
        } else {
            tracing::debug!("Validation disabled; recording {} unchecked", method_name);
        }

        if let (InvocationKind::Legacy, Some(callable)) = (invocation.kind, &invocation.descriptor)
        {
            self.registry
                .define_member(&invocation.target, method_name.clone(), callable.clone());
        }

        let metadata = MethodMetadata {
            name: method_name,
            http_method: annotation.method.clone(),
            path: annotation.path.clone(),
            options: annotation.options.clone(),
        };
        self.registry.upsert_method(&invocation.target, metadata.clone());

        Ok(metadata)
    }

    /// @acp:summary "Apply a root URI annotation to a class"
    pub fn apply_root_uri(
        &mut self,
        annotation: &RootUriAnnotation,
        args: &[AnnotationArg],
    ) -> Result<()> {
        let invocation = normalize(args)?;

        if let Some(kind @ (ContextKind::Method | ContextKind::Field)) = invocation.context_kind {
            return Err(ConformError::UnsupportedTarget(format!(
                "root URI annotation must decorate a class, not a {:?}",
                kind
            )));
        }

        self.registry
            .set_root_uri(&invocation.target, annotation.uri.clone());
        Ok(())
    }

    /// The decorated function, from the descriptor or the class's own lookup
    fn locate_callable(&self, invocation: &Invocation, method_name: &str) -> Option<Callable> {
        match invocation.kind {
            InvocationKind::Legacy => invocation.descriptor.clone(),
            InvocationKind::Modern => self
                .registry
                .member(&invocation.target, method_name)
                .cloned(),
        }
    }

    fn check_signature(
        &self,
        method_name: &str,
        annotation: &HttpAnnotation,
        callable: Option<&Callable>,
    ) -> Result<()> {
        let source = callable.and_then(|c| c.source.as_deref());
        let params = match inspect(source) {
            SignatureInspection::Parsed(params) => params,
            SignatureInspection::Indeterminate => {
                tracing::debug!("Signature of {} not available; check deferred", method_name);
                return Ok(());
            }
        };

        let op = OperationDescriptor::new(annotation.method.clone(), annotation.path.clone())
            .with_name(method_name);
        let result = self.rules.validate_parsed_signature(method_name, &op, &params);
        if result.is_valid {
            return Ok(());
        }

        Err(ConformError::SignatureViolation {
            method: method_name.to_string(),
            violations: result.errors,
            canonical: result.suggestions.into_iter().next().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassId;

    fn user_api() -> ClassId {
        ClassId::new("UserApi")
    }

    #[test]
    fn test_happy_path_records_metadata() {
        let mut annotator = Annotator::default();
        let args = legacy_args(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(request: GetUserRequest, ...options) {}"),
        );

        let metadata = annotator.apply_http(&get("/users/{id}"), &args).unwrap();

        assert_eq!(metadata.name, "getUser");
        assert_eq!(metadata.http_method.to_string(), "GET");
        assert_eq!(metadata.path, "/users/{id}");
        assert_eq!(annotator.registry().methods_metadata(&user_api()).len(), 1);
    }

    #[test]
    fn test_literal_path_param_rejected() {
        let mut annotator = Annotator::default();
        let args = legacy_args(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(id: string, ...options) {}"),
        );

        let err = annotator.apply_http(&get("/users/{id}"), &args).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("\"id\""));
        assert!(message.contains("with_path_param"));
        assert!(annotator.registry().methods_metadata(&user_api()).is_empty());
    }

    #[test]
    fn test_malformed_path_blocks_registration() {
        let mut annotator = Annotator::default();
        let args = legacy_args(&user_api(), "listUsers", Callable::undefined());

        let err = annotator.apply_http(&get("/users/"), &args).unwrap_err();
        assert!(matches!(err, ConformError::MalformedPath { .. }));
        assert!(annotator.registry().methods_metadata(&user_api()).is_empty());
    }

    #[test]
    fn test_modern_protocol_uses_member_lookup() {
        let mut annotator = Annotator::default();
        annotator.registry_mut().define_member(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(id, ...options) {}"),
        );

        let args = modern_args(&user_api(), DecoratorContext::method("getUser"));
        assert!(annotator.apply_http(&get("/users/{id}"), &args).is_err());
    }

    #[test]
    fn test_modern_protocol_defers_without_source() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("getUser"));

        let metadata = annotator.apply_http(&get("/users/{id}"), &args).unwrap();
        assert_eq!(metadata.name, "getUser");
    }

    #[test]
    fn test_disabled_mode_records_anyway() {
        let mut annotator = Annotator::default();
        annotator.set_validation_mode(ValidationMode::Disabled);
        let args = legacy_args(
            &user_api(),
            "getUser",
            Callable::with_source("getUser(id, ...options) {}"),
        );

        assert!(annotator.apply_http(&get("users//"), &args).is_ok());
        assert_eq!(annotator.registry().methods_metadata(&user_api()).len(), 1);

        annotator.set_validation_mode(ValidationMode::Strict);
        assert!(annotator.apply_http(&get("users//"), &args).is_err());
        // Earlier record is unaffected by the mode change
        assert_eq!(annotator.registry().methods_metadata(&user_api()).len(), 1);
    }

    #[test]
    fn test_redecorating_overwrites() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("getUser"));

        annotator.apply_http(&get("/users/{id}"), &args).unwrap();
        annotator.apply_http(&get("/people/{id}"), &args).unwrap();

        let methods = annotator.registry().methods_metadata(&user_api());
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].path, "/people/{id}");
    }

    #[test]
    fn test_http_annotation_on_class_rejected() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::class("UserApi"));
        let err = annotator.apply_http(&get("/users"), &args).unwrap_err();
        assert!(matches!(err, ConformError::UnsupportedTarget(_)));
    }

    #[test]
    fn test_root_uri_both_protocols() {
        let mut annotator = Annotator::default();
        annotator
            .apply_root_uri(&root_uri("/api/v1"), &[AnnotationArg::Target(user_api())])
            .unwrap();
        assert_eq!(annotator.registry().root_uri(&user_api()), Some("/api/v1"));

        let other = ClassId::new("OrderApi");
        annotator
            .apply_root_uri(
                &root_uri("/orders"),
                &modern_args(&other, DecoratorContext::class("OrderApi")),
            )
            .unwrap();
        assert_eq!(annotator.registry().root_uri_registry().len(), 2);
    }

    #[test]
    fn test_root_uri_on_method_rejected() {
        let mut annotator = Annotator::default();
        let args = modern_args(&user_api(), DecoratorContext::method("getUser"));
        assert!(annotator.apply_root_uri(&root_uri("/api"), &args).is_err());
    }
}
