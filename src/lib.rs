//! shellforge materializes named profiles (template bundles describing a
//! development environment) into target project directories, after resolving
//! configuration from layered sources. Generation is non-destructive and
//! crash-safe: existing files are never overwritten and writes are atomic.

/// Command-line interface module for the shellforge application
pub mod cli;

/// User-level and project-level configuration loading
/// Supports JSON and YAML formats with `${VAR}` substitution
pub mod config;

/// Common constants shared across modules
pub mod constants;

/// Environment variable substitution in loaded configuration values
pub mod envsub;

/// Error types and handling for the shellforge application
pub mod error;

/// Crash-safe, non-destructive file materialization and path confinement
pub mod fsops;

/// Template tree walking and file generation
pub mod generator;

/// Post-create hook execution with bounded wall-clock time
pub mod hooks;

/// Precedence-ordered deep configuration merging
pub mod merge;

/// Profile types and structural validation
pub mod profile;

/// Profile discovery and the name-keyed registry
pub mod registry;

/// Template parsing and rendering functionality
/// Handles the actual template processing logic
pub mod renderer;

/// Scaffolding orchestration
/// Combines all components into the end-to-end create operation
pub mod scaffold;

/// Schema validation for requests and configuration
pub mod validation;
