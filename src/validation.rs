//! Schema validation for scaffold requests and configuration.
//! Thin adapter over the jsonschema crate: request shape and the general
//! configuration shape use schemas compiled once at startup; per-profile
//! option schemas are compiled on demand.

use crate::error::{Error, Result};
use log::debug;
use serde_json::{json, Value};

/// Compiled validators for the fixed schemas.
pub struct Validator {
    request: jsonschema::Validator,
    config: jsonschema::Validator,
}

fn compile(schema: &Value) -> Result<jsonschema::Validator> {
    jsonschema::options()
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| Error::Internal { message: format!("invalid schema: {}", e) })
}

/// Collects all validation failures as `path message` pairs, or None when
/// the instance is valid.
fn collect_errors(validator: &jsonschema::Validator, instance: &Value) -> Option<String> {
    let messages: Vec<String> = validator
        .iter_errors(instance)
        .map(|err| format!("{} {}", err.instance_path(), err).trim().to_string())
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join(", "))
    }
}

impl Validator {
    pub fn new() -> Result<Self> {
        Ok(Validator {
            request: compile(&request_schema())?,
            config: compile(&config_schema())?,
        })
    }

    /// Validates the shape of a scaffold request.
    ///
    /// # Errors
    /// * `Error::InvalidInput` listing every violated constraint
    pub fn validate_request(&self, input: &Value) -> Result<()> {
        if let Some(message) = collect_errors(&self.request, input) {
            return Err(Error::InvalidInput { message });
        }
        debug!("Request validation passed");
        Ok(())
    }

    /// Validates a merged configuration against the general config schema.
    pub fn validate_config(&self, config: &Value) -> Result<()> {
        if let Some(message) = collect_errors(&self.config, config) {
            return Err(Error::InvalidConfig {
                message,
                path: "merged configuration".to_string(),
            });
        }
        debug!("Config validation passed");
        Ok(())
    }

    /// Validates the merged options against a profile's declared option
    /// schema. Without a schema only the object shape is checked.
    pub fn validate_profile_options(
        &self,
        options: &Value,
        profile_schema: Option<&Value>,
    ) -> Result<()> {
        let Some(schema) = profile_schema else {
            if !options.is_object() {
                return Err(Error::InvalidOptions {
                    message: "profile options must be an object".to_string(),
                });
            }
            debug!("Profile options validation passed (no schema)");
            return Ok(());
        };

        let validator = compile(schema)?;
        if let Some(message) = collect_errors(&validator, options) {
            return Err(Error::InvalidOptions { message });
        }
        debug!("Profile options validation passed");
        Ok(())
    }
}

fn request_schema() -> Value {
    json!({
        "type": "object",
        "required": ["projectPath", "profile"],
        "properties": {
            "projectPath": {
                "type": "string",
                "minLength": 1,
                "description": "Path to the project directory"
            },
            "profile": {
                "type": "string",
                "minLength": 1,
                "pattern": "^[a-z0-9][a-z0-9-]*$",
                "description": "Profile name (lowercase, alphanumeric with hyphens)"
            },
            "options": {
                "type": "object",
                "description": "Optional configuration overrides",
                "additionalProperties": true
            }
        },
        "additionalProperties": false
    })
}

fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "email": {
                "type": "string",
                "format": "email",
                "description": "User email address"
            },
            "name": {
                "type": "string",
                "minLength": 1,
                "description": "User full name"
            },
            "gitAutoInit": {
                "type": "boolean",
                "description": "Automatically initialize git repository"
            },
            "defaultPackages": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Default packages to include in all profiles"
            },
            "nodeVersion": {
                "type": "string",
                "pattern": "^\\d+(\\.\\d+)?(\\.\\d+)?$",
                "description": "Node.js version (e.g., \"20\", \"20.11\", \"20.11.1\")"
            },
            "pythonVersion": {
                "type": "string",
                "pattern": "^\\d+(\\.\\d+)?(\\.\\d+)?$",
                "description": "Python version (e.g., \"3.11\", \"3.11.5\")"
            },
            "javaVersion": {
                "type": "string",
                "pattern": "^\\d+$",
                "description": "Java version (e.g., \"17\", \"21\")"
            },
            "projectName": {
                "type": "string",
                "minLength": 1,
                "description": "Project name"
            },
            "description": {
                "type": "string",
                "description": "Project description"
            }
        },
        "additionalProperties": true
    })
}
