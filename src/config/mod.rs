//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};

use crate::compliance::CheckOptions;
use crate::error::Result;
use crate::naming::{NamingConfig, NamingRules};

/// Default configuration file name
pub const CONFIG_FILE: &str = ".conform.config.json";

fn default_config_schema() -> String {
    "https://api-conform.dev/schemas/v1/conform.config.schema.json".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_manifest_suffix() -> String {
    ".conform.json".to_string()
}

/// @acp:summary "Whether annotation-time checks run"
///
/// `Disabled` still records metadata; it only skips path and signature checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Strict,
    Disabled,
}

impl ValidationMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, ValidationMode::Strict)
    }
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "disabled" | "off" => Ok(ValidationMode::Disabled),
            _ => Err(format!("Unknown validation mode: {}", s)),
        }
    }
}

/// @acp:summary "Main configuration structure"
/// @acp:lock normal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON Schema URL for validation
    #[serde(rename = "$schema", default = "default_config_schema")]
    pub schema: String,

    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Annotation-time checking mode
    #[serde(default)]
    pub mode: ValidationMode,

    /// Naming rule inputs
    #[serde(default)]
    pub naming: NamingConfig,

    /// Audit toggles
    #[serde(default)]
    pub check: CheckOptions,

    /// File suffix of declaration manifests picked up by directory scans
    #[serde(default = "default_manifest_suffix")]
    pub manifest_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_config_schema(),
            version: default_version(),
            mode: ValidationMode::default(),
            naming: NamingConfig::default(),
            check: CheckOptions::default(),
            manifest_suffix: default_manifest_suffix(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load config if the file exists, defaults otherwise"
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Compile the naming section
    pub fn naming_rules(&self) -> Result<NamingRules> {
        NamingRules::new(&self.naming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::PathParamOrder;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.mode, ValidationMode::Strict);
        assert_eq!(config.naming, NamingConfig::default());
        assert!(config.check.enable_naming_validation);
        assert!(!config.check.require_documentation);
        assert_eq!(config.manifest_suffix, ".conform.json");
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "mode": "disabled",
            "naming": { "pathParamOrder": "path", "stopWords": ["api", "rest"] },
            "check": { "requireDocumentation": true }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.mode, ValidationMode::Disabled);
        assert_eq!(config.naming.path_param_order, PathParamOrder::Path);
        assert_eq!(config.naming.stop_words, vec!["api", "rest"]);
        assert_eq!(config.naming.version_pattern, r"^v\d+$");
        assert!(config.check.require_documentation);
        assert!(config.check.enable_type_validation);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.mode = ValidationMode::Disabled;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.mode, ValidationMode::Disabled);
        assert!(loaded.naming_rules().is_ok());
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.mode, ValidationMode::Strict);
        assert_eq!(
            config.schema,
            "https://api-conform.dev/schemas/v1/conform.config.schema.json"
        );

        std::fs::write(&path, r#"{ "mode": "disabled" }"#).unwrap();
        assert_eq!(Config::load_or_default(&path).unwrap().mode, ValidationMode::Disabled);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("STRICT".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
        assert_eq!("off".parse::<ValidationMode>(), Ok(ValidationMode::Disabled));
        assert!("loose".parse::<ValidationMode>().is_err());
    }
}
