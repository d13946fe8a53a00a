//! @acp:module "Check Command"
//! @acp:summary "Replay declaration manifests and audit every class"
//! @acp:domain cli
//! @acp:layer handler

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indexmap::IndexMap;
use serde::Serialize;

use crate::annotation::Annotator;
use crate::compliance::{check_compliance_with, ValidationResult};
use crate::config::Config;
use crate::manifest::{apply_manifest, discover_manifests, load_manifest};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Manifest file or directory to scan
    pub target: PathBuf,
    /// Emit JSON instead of styled text
    pub json: bool,
}

/// @acp:summary "Outcome for one manifest file"
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestReport {
    pub file: String,
    /// Rejected declarations as `Class.method: message`
    pub failures: Vec<String>,
    pub classes: IndexMap<String, ValidationResult>,
}

impl ManifestReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.classes.values().all(|r| r.is_valid)
    }
}

/// Execute the check command
pub fn execute_check(options: CheckOptions, config: &Config) -> Result<()> {
    let manifests = discover_manifests(&options.target, &config.manifest_suffix);
    if manifests.is_empty() {
        eprintln!(
            "{} No *{} manifests under {}",
            style("✗").red(),
            config.manifest_suffix,
            options.target.display()
        );
        std::process::exit(1);
    }

    let reports = manifests
        .iter()
        .map(|path| check_manifest(path, config))
        .collect::<Result<Vec<_>>>()?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        if !options.json {
            eprintln!(
                "\n{} {} of {} manifest(s) failed",
                style("✗").red(),
                failed,
                reports.len()
            );
        }
        std::process::exit(1);
    }

    if !options.json {
        println!("\n{} {} manifest(s) conform", style("✓").green(), reports.len());
    }
    Ok(())
}

/// Apply and audit one manifest file
pub fn check_manifest(path: &Path, config: &Config) -> Result<ManifestReport> {
    let manifest = load_manifest(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let mut annotator = Annotator::from_config(config)?;

    let failures = apply_manifest(&mut annotator, &manifest)
        .into_iter()
        .map(|f| format!("{}: {}", f.declaration, f.error))
        .collect();

    let check = config
        .check
        .clone()
        .with_module_context(manifest.module_context());

    let classes = manifest
        .class_ids()
        .map(|class| {
            let result =
                check_compliance_with(annotator.registry(), &class, &check, annotator.rules());
            (class.to_string(), result)
        })
        .collect();

    Ok(ManifestReport {
        file: path.display().to_string(),
        failures,
        classes,
    })
}

fn print_report(report: &ManifestReport) {
    let marker = if report.passed() {
        style("✓").green()
    } else {
        style("✗").red()
    };
    println!("{} {}", marker, style(&report.file).bold());

    for failure in &report.failures {
        println!("  {} {}", style("rejected").red(), failure.replace('\n', "\n    "));
    }

    for (class, result) in &report.classes {
        if result.is_valid && result.suggestions.is_empty() {
            println!("  {} {}", style("•").dim(), class);
            continue;
        }
        println!("  {} {}", style("→").cyan(), class);
        for error in &result.errors {
            println!("    {} {}", style("error").red(), error);
        }
        for suggestion in &result.suggestions {
            println!("    {} {}", style("hint").yellow(), suggestion);
        }
    }
}
