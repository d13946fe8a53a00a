//! @acp:module "URI Resolver"
//! @acp:summary "Combine root, path template, path parameters and query into one URI"
//! @acp:domain core
//! @acp:layer logic
//!
//! # Pipeline
//!
//! Options are collected through mutator functions (`with_root`,
//! `with_path_param`, `with_query_param`, ...) in any order. The stages below
//! always run in this order, so the call order of the mutators never changes
//! the result:
//!
//! 1. **Join** the root (trailing slashes stripped) and the path with one `/`
//! 2. **Substitute** every `{name}` with the percent-encoded parameter value
//! 3. **Verify** nothing is left unresolved (all leftovers are reported)
//! 4. **Append** non-empty query entries in insertion order
//!
//! ```rust
//! use conform::uri::{resolve_uri, with_path_param, with_query_param, with_root};
//!
//! let uri = resolve_uri(
//!     "/users/{id}",
//!     [with_query_param("a", Some("1")), with_path_param("id", "42"), with_root("/api/v1")],
//! )?;
//! assert_eq!(uri, "/api/v1/users/42?a=1");
//! # Ok::<(), conform::ConformError>(())
//! ```

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

use crate::error::{ConformError, Result};
use crate::registry::{ClassId, ClientRegistry};

static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// @acp:summary "Collected resolution inputs"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriOptions {
    pub root: Option<String>,
    pub params: IndexMap<String, String>,
    /// `None` stands for an absent or null value and is never emitted
    pub query: IndexMap<String, Option<String>>,
}

/// A composable option mutator
pub type UriOption = Box<dyn FnOnce(&mut UriOptions)>;

pub fn with_root(root: impl Into<String>) -> UriOption {
    let root = root.into();
    Box::new(move |opts| opts.root = Some(root))
}

/// Bind one `{name}` placeholder
pub fn with_path_param(name: impl Into<String>, value: impl Into<String>) -> UriOption {
    let (name, value) = (name.into(), value.into());
    Box::new(move |opts| {
        opts.params.insert(name, value);
    })
}

pub fn with_path_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> UriOption
where
    K: Into<String>,
    V: Into<String>,
{
    let params: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    Box::new(move |opts| opts.params.extend(params))
}

pub fn with_query_param<V: Into<String>>(name: impl Into<String>, value: Option<V>) -> UriOption {
    let (name, value) = (name.into(), value.map(Into::into));
    Box::new(move |opts| {
        opts.query.insert(name, value);
    })
}

pub fn with_query<K, V>(query: impl IntoIterator<Item = (K, Option<V>)>) -> UriOption
where
    K: Into<String>,
    V: Into<String>,
{
    let query: Vec<(String, Option<String>)> = query
        .into_iter()
        .map(|(k, v)| (k.into(), v.map(Into::into)))
        .collect();
    Box::new(move |opts| opts.query.extend(query))
}

impl UriOptions {
    pub fn from_options(options: impl IntoIterator<Item = UriOption>) -> Self {
        let mut opts = Self::default();
        for apply in options {
            apply(&mut opts);
        }
        opts
    }

    /// Run the resolution pipeline against a path template
    pub fn resolve(&self, path: &str) -> Result<String> {
        let joined = join_root(self.root.as_deref(), path);
        let substituted = substitute_params(&joined, &self.params);

        let missing = unresolved_placeholders(&substituted);
        if !missing.is_empty() {
            return Err(ConformError::MissingPathParameter {
                path: path.to_string(),
                missing,
            });
        }

        Ok(append_query(substituted, &self.query))
    }
}

/// @acp:summary "Resolve a path template with the given option mutators"
pub fn resolve_uri(path: &str, options: impl IntoIterator<Item = UriOption>) -> Result<String> {
    UriOptions::from_options(options).resolve(path)
}

/// Resolve a registered method's path against its class's (inherited) root URI
///
/// An explicit `with_root` option wins over the registered root.
pub fn resolve_request_uri(
    registry: &ClientRegistry,
    class: &ClassId,
    method: &str,
    options: impl IntoIterator<Item = UriOption>,
) -> Result<String> {
    let metadata = registry
        .methods_metadata(class)
        .iter()
        .find(|m| m.name == method)
        .ok_or_else(|| ConformError::UnknownMethod {
            class: class.to_string(),
            method: method.to_string(),
        })?;

    let mut opts = UriOptions {
        root: registry.root_uri(class).map(str::to_string),
        ..Default::default()
    };
    for apply in options {
        apply(&mut opts);
    }
    opts.resolve(&metadata.path)
}

fn join_root(root: Option<&str>, path: &str) -> String {
    let Some(root) = root else {
        return path.to_string();
    };

    let root = root.trim_end_matches('/');
    let rest = path.trim_start_matches('/');

    match (root.is_empty(), rest.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", rest),
        (false, true) => root.to_string(),
        (false, false) => format!("{}/{}", root, rest),
    }
}

fn substitute_params(template: &str, params: &IndexMap<String, String>) -> String {
    PLACEHOLDER_TOKEN
        .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
            Some(value) => urlencoding::encode(value).into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Every placeholder still present, deduplicated, in order of appearance
fn unresolved_placeholders(uri: &str) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_TOKEN.captures_iter(uri) {
        let name = caps[1].to_string();
        if !missing.contains(&name) {
            missing.push(name);
        }
    }
    missing
}

fn append_query(uri: String, query: &IndexMap<String, Option<String>>) -> String {
    let pairs: Vec<String> = query
        .iter()
        .filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(v)
            )),
            _ => None,
        })
        .collect();

    if pairs.is_empty() {
        return uri;
    }

    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}{}", uri, separator, pairs.join("&"))
}
