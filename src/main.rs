#![forbid(unsafe_code)]
//! Conform Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use conform::commands::{
    execute_check, execute_derive, execute_resolve, parse_key_value, CheckOptions, DeriveOptions,
    ResolveOptions,
};
use conform::config::{ValidationMode, CONFIG_FILE};
use conform::Config;

#[derive(Parser)]
#[command(name = "conform")]
#[command(about = "Naming and shape conventions for generated API clients")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Override the configured validation mode (strict, disabled)
    #[arg(long, global = true, env = "CONFORM_MODE")]
    mode: Option<ValidationMode>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay declaration manifests and audit every class
    Check {
        /// Manifest file or directory to scan
        #[arg(default_value = ".")]
        target: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print canonical names for an HTTP operation
    Derive {
        /// HTTP method
        #[arg(short, long)]
        method: String,

        /// Path template, e.g. /api/users/{id}
        #[arg(short, long)]
        path: String,

        /// Path parameter in declared order (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a path template into a request URI
    Resolve {
        /// Path template
        path: String,

        /// Root URI to prefix
        #[arg(short, long)]
        root: Option<String>,

        /// Path parameter binding name=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Query entry name=value (repeatable)
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("conform={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let mut config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} Invalid config {}: {}",
                style("✗").red(),
                cli.config.display(),
                e
            );
            std::process::exit(1);
        }
    };

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    match cli.command {
        Commands::Check { target, json } => {
            execute_check(CheckOptions { target, json }, &config)?;
        }

        Commands::Derive { method, path, params, json } => {
            let options = DeriveOptions { method, path, params, json };
            execute_derive(options, &config)?;
        }

        Commands::Resolve { path, root, params, query } => {
            let options = ResolveOptions { path, root, params, query };
            execute_resolve(options)?;
        }
    }

    Ok(())
}
