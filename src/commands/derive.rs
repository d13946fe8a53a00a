//! @acp:module "Derive Command"
//! @acp:summary "Print the canonical names for one HTTP operation"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::naming::{
    extract_path_placeholders, DerivedNames, OperationDescriptor, ParameterDescriptor,
};
use crate::path::validate_path;

/// Options for the derive command
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    /// HTTP method (get, post, ...)
    pub method: String,
    /// Path template
    pub path: String,
    /// Path parameters in declared order; defaults to placeholder order
    pub params: Vec<String>,
    /// Emit JSON instead of styled text
    pub json: bool,
}

impl DeriveOptions {
    pub fn operation(&self) -> OperationDescriptor {
        let names = if self.params.is_empty() {
            extract_path_placeholders(&self.path)
        } else {
            self.params.clone()
        };

        names.into_iter().fold(
            OperationDescriptor::new(self.method.as_str(), self.path.as_str()),
            |op, name| op.with_parameter(ParameterDescriptor::path(name)),
        )
    }
}

/// Derive names with the configured rules
pub fn derive(options: &DeriveOptions, config: &Config) -> Result<DerivedNames> {
    let rules = config.naming_rules()?;
    Ok(rules.derive_operation_names(&options.operation()))
}

/// Execute the derive command
pub fn execute_derive(options: DeriveOptions, config: &Config) -> Result<()> {
    let names = derive(&options, config)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if let Some(rule) = validate_path(&options.path).violation {
        println!(
            "{} Path {} breaks a format rule: {}",
            style("⚠").yellow(),
            options.path,
            rule.describe()
        );
    }

    println!("{} {} {}", style("→").cyan(), options.method.to_uppercase(), options.path);
    println!("  Method:    {}", style(&names.method_name).bold());
    println!("  Request:   {}", names.request_type);
    println!("  Response:  {}", names.response_type);
    println!("  Signature: {}({})", names.method_name, names.parameter_signature);
    Ok(())
}
