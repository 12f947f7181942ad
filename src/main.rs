//! shellforge's main application entry point.
//! Parses command-line arguments, loads the profile registry and routes the
//! two exposed operations: create scaffold and list profiles.

use serde_json::json;
use shellforge::{
    cli::{get_args, parse_option_pairs, resolve_templates_dir, Args, Command},
    error::{default_error_handler, Result},
    registry::ProfileRegistry,
    scaffold::{ScaffoldRequest, Scaffolder},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let templates_dir = resolve_templates_dir(args.templates_dir);
    let registry = ProfileRegistry::load(&templates_dir)?;
    let scaffolder = Scaffolder::new(registry)?;

    match args.command {
        Command::New { project_dir, profile, options } => {
            let request = ScaffoldRequest {
                project_path: project_dir,
                profile,
                options: parse_option_pairs(&options)?,
            };
            let output = scaffolder.create_scaffold(&request)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
            );
        }
        Command::List => {
            let profiles = scaffolder.list_profiles();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "profiles": profiles }))
                    .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
            );
        }
    }

    Ok(())
}
