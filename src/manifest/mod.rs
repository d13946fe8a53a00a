//! @acp:module "Declaration Manifests"
//! @acp:summary "JSON descriptions of annotated client classes, replayed through the annotator"
//! @acp:domain cli
//! @acp:layer adapter
//!
//! A manifest records what a runtime would have done while loading a client
//! module: which classes exist, which annotations were applied to which
//! methods, and through which invocation protocol.
//!
//! ```json
//! {
//!   "types": ["GetUsersByIdResponse"],
//!   "classes": [{
//!     "name": "UserApi",
//!     "rootUri": "/api/v1",
//!     "methods": [{
//!       "name": "getUsersById",
//!       "httpMethod": "get",
//!       "path": "/users/{id}",
//!       "source": "getUsersById(...options) {}",
//!       "protocol": "modern"
//!     }]
//!   }]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::annotation::{
    legacy_args, modern_args, root_uri, AnnotationArg, Annotator, DecoratorContext, HttpAnnotation,
    InvocationKind,
};
use crate::compliance::ModuleContext;
use crate::error::{ConformError, Result};
use crate::naming::HttpMethod;
use crate::registry::{Callable, ClassId, MethodOptions};

/// @acp:summary "One annotated method"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDeclaration {
    pub name: String,
    pub http_method: HttpMethod,
    pub path: String,
    /// Printable function source; absent when not yet defined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default = "default_protocol")]
    pub protocol: InvocationKind,
    #[serde(default)]
    pub options: MethodOptions,
}

fn default_protocol() -> InvocationKind {
    InvocationKind::Legacy
}

/// @acp:summary "One annotated client class"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_uri: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDeclaration>,
}

/// @acp:summary "A whole client module"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
    /// Type names exported by the module
    #[serde(default)]
    pub types: Vec<String>,
}

impl Manifest {
    pub fn module_context(&self) -> ModuleContext {
        ModuleContext::new(self.types.iter().cloned())
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.iter().map(|c| ClassId::new(c.name.as_str()))
    }
}

/// @acp:summary "A declaration the annotator refused"
#[derive(Debug)]
pub struct DeclarationFailure {
    /// `Class` or `Class.method`
    pub declaration: String,
    pub error: ConformError,
}

pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Manifest files under `root` whose name ends with `suffix`, sorted
///
/// A file path is returned as-is.
pub fn discover_manifests(root: &Path, suffix: &str) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(suffix))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// @acp:summary "Replay every declaration; collect failures instead of stopping"
pub fn apply_manifest(annotator: &mut Annotator, manifest: &Manifest) -> Vec<DeclarationFailure> {
    let mut failures = Vec::new();

    // Parents first, so extends may point forward within the manifest
    for class in &manifest.classes {
        let id = ClassId::new(class.name.as_str());
        let parent = class.extends.as_deref().map(ClassId::new);
        annotator.registry_mut().declare_class(id, parent);
    }

    for class in &manifest.classes {
        let id = ClassId::new(class.name.as_str());

        if let Some(parent) = &class.extends {
            if !annotator.registry().contains_class(&ClassId::new(parent.as_str())) {
                failures.push(DeclarationFailure {
                    declaration: class.name.clone(),
                    error: ConformError::UnknownClass(parent.clone()),
                });
            }
        }

        if let Some(uri) = &class.root_uri {
            let args = [AnnotationArg::Target(id.clone())];
            if let Err(error) = annotator.apply_root_uri(&root_uri(uri.as_str()), &args) {
                failures.push(DeclarationFailure {
                    declaration: class.name.clone(),
                    error,
                });
            }
        }

        for method in &class.methods {
            if let Err(error) = apply_method(annotator, &id, method) {
                failures.push(DeclarationFailure {
                    declaration: format!("{}.{}", class.name, method.name),
                    error,
                });
            }
        }
    }

    failures
}

fn apply_method(
    annotator: &mut Annotator,
    class: &ClassId,
    method: &MethodDeclaration,
) -> Result<()> {
    let annotation = HttpAnnotation::new(method.http_method.clone(), method.path.as_str())
        .with_options(method.options.clone());
    let callable = Callable {
        source: method.source.clone(),
    };

    let args = match method.protocol {
        InvocationKind::Legacy => legacy_args(class, &method.name, callable),
        InvocationKind::Modern => {
            // The class body is evaluated before its decorators run
            if callable.source.is_some() {
                annotator
                    .registry_mut()
                    .define_member(class, method.name.as_str(), callable);
            }
            modern_args(class, DecoratorContext::method(method.name.as_str()))
        }
    };

    annotator.apply_http(&annotation, &args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "types": ["GetUsersByIdResponse"],
        "classes": [
            {
                "name": "UserApi",
                "extends": "BaseApi",
                "methods": [
                    { "name": "getUsersById", "httpMethod": "get", "path": "/users/{id}",
                      "source": "getUsersById(...options) {}", "protocol": "modern" },
                    { "name": "deleteUser", "httpMethod": "DELETE", "path": "/users/{id}",
                      "source": "deleteUser(id, ...options) {}" },
                    { "name": "listUsers", "httpMethod": "get", "path": "users/" }
                ]
            },
            { "name": "BaseApi", "rootUri": "/api/v1" }
        ]
    }"#;

    #[test]
    fn test_apply_collects_every_failure() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let mut annotator = Annotator::default();

        let failures = apply_manifest(&mut annotator, &manifest);
        let names: Vec<&str> = failures.iter().map(|f| f.declaration.as_str()).collect();
        assert_eq!(names, vec!["UserApi.deleteUser", "UserApi.listUsers"]);

        let registry = annotator.registry();
        let user_api = ClassId::new("UserApi");
        assert_eq!(registry.methods_metadata(&user_api).len(), 1);
        assert_eq!(registry.root_uri(&user_api), Some("/api/v1"));
    }

    #[test]
    fn test_unknown_parent_reported() {
        let manifest: Manifest = serde_json::from_str(
            r#"{ "classes": [{ "name": "A", "extends": "Missing" }] }"#,
        )
        .unwrap();
        let mut annotator = Annotator::default();

        let failures = apply_manifest(&mut annotator, &manifest);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].declaration, "A");
        assert!(matches!(
            &failures[0].error,
            ConformError::UnknownClass(name) if name == "Missing"
        ));
    }

    #[test]
    fn test_load_and_discover() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/users.conform.json"), MANIFEST).unwrap();
        std::fs::write(dir.path().join("ignored.json"), "{}").unwrap();

        let found = discover_manifests(dir.path(), ".conform.json");
        assert_eq!(found.len(), 1);

        let manifest = load_manifest(&found[0]).unwrap();
        assert_eq!(manifest.classes.len(), 2);
        assert!(manifest.module_context().contains("GetUsersByIdResponse"));
        assert_eq!(manifest.classes[0].methods[1].protocol, InvocationKind::Legacy);
    }
}
