//! @acp:module "Resolve Command"
//! @acp:summary "Resolve a path template into a request URI"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;

use crate::uri::{resolve_uri, with_path_params, with_query, with_root, UriOption};

/// Options for the resolve command
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub path: String,
    pub root: Option<String>,
    pub params: Vec<(String, String)>,
    /// Empty values are dropped from the query string
    pub query: Vec<(String, String)>,
}

impl ResolveOptions {
    pub fn uri_options(&self) -> Vec<UriOption> {
        let mut options = vec![
            with_path_params(self.params.clone()),
            with_query(self.query.iter().map(|(k, v)| (k.clone(), Some(v.clone())))),
        ];
        if let Some(root) = &self.root {
            options.push(with_root(root.as_str()));
        }
        options
    }
}

/// Parse a `key=value` argument; the value may itself contain `=`
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got \"{}\"", s)),
    }
}

/// Execute the resolve command
pub fn execute_resolve(options: ResolveOptions) -> Result<()> {
    let uri = resolve_uri(&options.path, options.uri_options())?;
    println!("{}", uri);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("id=42"), Ok(("id".to_string(), "42".to_string())));
        assert_eq!(parse_key_value("q=a=b"), Ok(("q".to_string(), "a=b".to_string())));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_uri_options_resolve() {
        let options = ResolveOptions {
            path: "/users/{id}".to_string(),
            root: Some("/api/v1/".to_string()),
            params: vec![("id".to_string(), "42".to_string())],
            query: vec![
                ("empty".to_string(), String::new()),
                ("a".to_string(), "1".to_string()),
            ],
        };

        let uri = resolve_uri(&options.path, options.uri_options()).unwrap();
        assert_eq!(uri, "/api/v1/users/42?a=1");
    }
}
