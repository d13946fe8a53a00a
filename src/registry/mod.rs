//! @acp:module "Client Registry"
//! @acp:summary "Per-class operation metadata and root URIs as explicit owned state"
//! @acp:domain core
//! @acp:layer model
//! @acp:stability stable
//!
//! # Lifecycle
//!
//! The registry is written only while annotations are applied and is read
//! afterwards (audits, URI resolution). Nothing here is global: whoever owns
//! the [`ClientRegistry`] owns the state.
//!
//! ## Inheritance
//!
//! Classes may name a parent. Lookups walk the chain from the class itself
//! towards the root, so the most specific class wins:
//! - [`ClientRegistry::root_uri`]: nearest class with a root URI
//! - [`ClientRegistry::methods_metadata`]: own list, else nearest ancestor's
//! - [`ClientRegistry::member`]: nearest class defining the member

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::naming::HttpMethod;

/// @acp:summary "Identity of an annotated client class"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(String);

impl ClassId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// @acp:summary "A class member function as seen at declaration time"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    /// Printable source; `None` when the function is not defined yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Callable {
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
        }
    }

    pub fn undefined() -> Self {
        Self::default()
    }
}

/// @acp:summary "Options passed to an HTTP-method annotation"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other option, kept verbatim
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl MethodOptions {
    /// Whether a non-blank summary or description is present
    pub fn is_documented(&self) -> bool {
        [&self.summary, &self.description]
            .into_iter()
            .flatten()
            .any(|text| !text.trim().is_empty())
    }
}

/// @acp:summary "Durable record of one validated HTTP method"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMetadata {
    pub name: String,
    pub http_method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub options: MethodOptions,
}

/// @acp:summary "Everything recorded for one class"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassRecord {
    pub parent: Option<ClassId>,
    /// Own member functions, used for property lookup
    pub members: IndexMap<String, Callable>,
    /// Insertion-ordered, unique by method name
    pub methods: Vec<MethodMetadata>,
    pub root_uri: Option<String>,
}

/// @acp:summary "Owned store of class records and the root-URI registry"
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    classes: IndexMap<ClassId, ClassRecord>,
    root_uris: IndexMap<ClassId, String>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class, or update its parent if it already exists
    pub fn declare_class(&mut self, class: ClassId, parent: Option<ClassId>) -> &mut ClassRecord {
        let record = self.classes.entry(class).or_default();
        if parent.is_some() {
            record.parent = parent;
        }
        record
    }

    pub fn class(&self, class: &ClassId) -> Option<&ClassRecord> {
        self.classes.get(class)
    }

    pub fn contains_class(&self, class: &ClassId) -> bool {
        self.classes.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassId> {
        self.classes.keys()
    }

    /// The class followed by its ancestors, most specific first
    ///
    /// Stops at unknown parents and at the first repeated class.
    pub fn ancestry<'a>(&'a self, class: &'a ClassId) -> Vec<&'a ClassId> {
        let mut chain: Vec<&ClassId> = Vec::new();
        let mut current = Some(class);

        while let Some(id) = current {
            if chain.contains(&id) {
                tracing::warn!("Inheritance cycle detected at class {}", id);
                break;
            }
            chain.push(id);
            current = self.classes.get(id).and_then(|r| r.parent.as_ref());
        }

        chain
    }

    /// Record a member function on a class
    pub fn define_member(&mut self, class: &ClassId, name: impl Into<String>, callable: Callable) {
        self.declare_class(class.clone(), None)
            .members
            .insert(name.into(), callable);
    }

    /// Property lookup: the nearest class in the chain that defines `name`
    pub fn member(&self, class: &ClassId, name: &str) -> Option<&Callable> {
        self.ancestry(class)
            .into_iter()
            .filter_map(|id| self.classes.get(id))
            .find_map(|record| record.members.get(name))
    }

    /// Insert metadata, replacing any record with the same method name
    ///
    /// Returns `true` when an existing record was replaced.
    pub fn upsert_method(&mut self, class: &ClassId, metadata: MethodMetadata) -> bool {
        let record = self.declare_class(class.clone(), None);

        match record.methods.iter_mut().find(|m| m.name == metadata.name) {
            Some(existing) => {
                tracing::debug!("Replacing metadata for {}.{}", class, metadata.name);
                *existing = metadata;
                true
            }
            None => {
                record.methods.push(metadata);
                false
            }
        }
    }

    /// Metadata list of the class, or of its nearest ancestor that has one
    pub fn methods_metadata(&self, class: &ClassId) -> &[MethodMetadata] {
        self.ancestry(class)
            .into_iter()
            .filter_map(|id| self.classes.get(id))
            .find(|record| !record.methods.is_empty())
            .map(|record| record.methods.as_slice())
            .unwrap_or(&[])
    }

    /// Attach a root URI to a class and to the bulk registry
    pub fn set_root_uri(&mut self, class: &ClassId, uri: impl Into<String>) {
        let uri = uri.into();
        let record = self.declare_class(class.clone(), None);
        if let Some(previous) = &record.root_uri {
            tracing::debug!("Root URI of {} changes from {} to {}", class, previous, uri);
        }
        record.root_uri = Some(uri.clone());
        self.root_uris.insert(class.clone(), uri);
    }

    /// Root URI of the most specific class in the chain that set one
    pub fn root_uri(&self, class: &ClassId) -> Option<&str> {
        self.ancestry(class)
            .into_iter()
            .filter_map(|id| self.classes.get(id))
            .find_map(|record| record.root_uri.as_deref())
    }

    /// Every class-level root URI, in registration order
    pub fn root_uri_registry(&self) -> &IndexMap<ClassId, String> {
        &self.root_uris
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(name: &str, path: &str) -> MethodMetadata {
        MethodMetadata {
            name: name.to_string(),
            http_method: HttpMethod::Get,
            path: path.to_string(),
            options: MethodOptions::default(),
        }
    }

    #[test]
    fn test_upsert_overwrites_same_name() {
        let mut registry = ClientRegistry::new();
        let class = ClassId::new("UserApi");

        assert!(!registry.upsert_method(&class, metadata("getUser", "/users/{id}")));
        assert!(!registry.upsert_method(&class, metadata("listUsers", "/users")));
        assert!(registry.upsert_method(&class, metadata("getUser", "/v2/users/{id}")));

        let methods = registry.methods_metadata(&class);
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name, "getUser");
        assert_eq!(methods[0].path, "/v2/users/{id}");
        assert_eq!(methods[1].name, "listUsers");
    }

    #[test]
    fn test_root_uri_most_specific_wins() {
        let mut registry = ClientRegistry::new();
        let base = ClassId::new("BaseApi");
        let child = ClassId::new("ChildApi");
        let grandchild = ClassId::new("GrandchildApi");

        registry.declare_class(base.clone(), None);
        registry.declare_class(child.clone(), Some(base.clone()));
        registry.declare_class(grandchild.clone(), Some(child.clone()));
        registry.set_root_uri(&base, "/api");

        assert_eq!(registry.root_uri(&grandchild), Some("/api"));

        registry.set_root_uri(&child, "/api/v2");
        assert_eq!(registry.root_uri(&grandchild), Some("/api/v2"));
        assert_eq!(registry.root_uri(&base), Some("/api"));
    }

    #[test]
    fn test_root_uri_registry_bulk() {
        let mut registry = ClientRegistry::new();
        registry.set_root_uri(&ClassId::new("B"), "/b");
        registry.set_root_uri(&ClassId::new("A"), "/a");

        let entries: Vec<(&str, &str)> = registry
            .root_uri_registry()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(entries, vec![("B", "/b"), ("A", "/a")]);
    }

    #[test]
    fn test_methods_metadata_falls_back_to_ancestor() {
        let mut registry = ClientRegistry::new();
        let base = ClassId::new("Base");
        let child = ClassId::new("Child");
        registry.declare_class(child.clone(), Some(base.clone()));
        registry.upsert_method(&base, metadata("getThing", "/thing"));

        assert_eq!(registry.methods_metadata(&child).len(), 1);

        registry.upsert_method(&child, metadata("getOther", "/other"));
        assert_eq!(registry.methods_metadata(&child)[0].name, "getOther");
        assert_eq!(registry.methods_metadata(&base)[0].name, "getThing");
    }

    #[test]
    fn test_member_lookup_walks_chain() {
        let mut registry = ClientRegistry::new();
        let base = ClassId::new("Base");
        let child = ClassId::new("Child");
        registry.declare_class(child.clone(), Some(base.clone()));
        registry.define_member(&base, "ping", Callable::with_source("ping(...options) {}"));

        assert!(registry.member(&child, "ping").is_some());
        assert!(registry.member(&child, "pong").is_none());
    }

    #[test]
    fn test_ancestry_cycle_terminates() {
        let mut registry = ClientRegistry::new();
        let a = ClassId::new("A");
        let b = ClassId::new("B");
        registry.declare_class(a.clone(), Some(b.clone()));
        registry.declare_class(b.clone(), Some(a.clone()));

        assert_eq!(registry.ancestry(&a).len(), 2);
        assert_eq!(registry.root_uri(&a), None);
    }

    #[test]
    fn test_unknown_class_is_empty() {
        let registry = ClientRegistry::new();
        let ghost = ClassId::new("Ghost");
        assert!(registry.methods_metadata(&ghost).is_empty());
        assert_eq!(registry.root_uri(&ghost), None);
    }

    #[test]
    fn test_documented_options() {
        let mut options = MethodOptions::default();
        assert!(!options.is_documented());
        options.description = Some("  ".to_string());
        assert!(!options.is_documented());
        options.summary = Some("Fetch a user".to_string());
        assert!(options.is_documented());
    }
}
