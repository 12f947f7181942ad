//! Command-line interface implementation for shellforge.
//! Provides argument parsing and help text formatting using clap.

use crate::error::{Error, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Command-line arguments structure for shellforge.
#[derive(Parser, Debug)]
#[command(author, version, about = "shellforge: profile-based Nix devshell scaffolding tool", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Directory containing profile bundles
    /// (defaults to $SHELLFORGE_TEMPLATES, then ./templates)
    #[arg(long, value_name = "DIR", global = true)]
    pub templates_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a scaffold in an existing project directory.
    /// Non-destructive: existing files are never overwritten.
    New {
        /// Target project directory
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,

        /// Profile name (e.g. "typescript-node", "python-fastapi")
        #[arg(short, long)]
        profile: String,

        /// Per-request configuration overrides as key=value pairs.
        /// Values are parsed as JSON when possible, otherwise taken verbatim.
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// List available profiles with their descriptions
    List,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}

/// Resolves the templates root: the explicit flag, then the
/// SHELLFORGE_TEMPLATES environment variable, then ./templates.
pub fn resolve_templates_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("SHELLFORGE_TEMPLATES").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("templates"))
}

/// Turns `key=value` pairs into a request options mapping. Values that parse
/// as JSON keep their type; everything else becomes a string.
pub fn parse_option_pairs(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut options = Map::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| Error::InvalidInput {
            message: format!("option must be key=value, got '{}'", pair),
        })?;
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        options.insert(key.to_string(), value);
    }
    Ok(options)
}
