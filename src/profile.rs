//! Profile types and structural validation.
//! A profile is a named, versioned template bundle: a recursive template
//! tree, default configuration and an optional post-create hook. Profiles
//! are immutable once loaded.

use crate::constants::FLAKE_KEY;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// The recursive template descriptor shape: a relative source path, an
/// ordered mapping of logical keys, or an ordered list. One tagged variant
/// with a single recursive visitor, no ad hoc type probing per level.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TemplateTree {
    /// Path of one template file, relative to the profile directory
    Leaf(String),
    /// Ordered list of subtrees
    Sequence(Vec<TemplateTree>),
    /// Ordered mapping of logical output keys to subtrees
    Named(IndexMap<String, TemplateTree>),
}

impl TemplateTree {
    /// Visits every leaf depth-first in the tree's own order (mapping
    /// insertion order, sequence order), stopping at the first error.
    pub fn for_each_leaf(&self, visit: &mut dyn FnMut(&str) -> Result<()>) -> Result<()> {
        match self {
            TemplateTree::Leaf(path) => visit(path),
            TemplateTree::Sequence(items) => {
                for item in items {
                    item.for_each_leaf(visit)?;
                }
                Ok(())
            }
            TemplateTree::Named(entries) => {
                for subtree in entries.values() {
                    subtree.for_each_leaf(visit)?;
                }
                Ok(())
            }
        }
    }
}

/// Declared option metadata carried in a profile descriptor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileOption {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: OptionType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(rename = "enum", default)]
    pub choices: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    String,
    Number,
    Boolean,
    Array,
}

/// Descriptive metadata of a profile. `name`, `description` and `version`
/// are required non-empty strings; everything else is optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub supported_options: Vec<ProfileOption>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub post_create: Option<String>,
}

impl ProfileMetadata {
    /// Display name, falling back to the profile name when the descriptor
    /// omits one.
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Raw profile descriptor as parsed from `profile.{json,yml,yaml}`.
#[derive(Debug, Deserialize)]
pub struct ProfileDescriptor {
    pub metadata: ProfileMetadata,
    pub templates: TemplateTree,
    #[serde(default)]
    pub defaults: Value,
}

/// A loaded, validated profile. Immutable once in the registry.
#[derive(Debug, Clone)]
pub struct Profile {
    pub metadata: ProfileMetadata,
    pub templates: TemplateTree,
    pub defaults: Map<String, Value>,
    /// Absolute profile directory; leaf paths resolve against this
    pub root: PathBuf,
}

/// Summary shape returned by the list operation: metadata only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl Profile {
    /// Builds a profile from a parsed descriptor, applying structural
    /// validation and checking that every template leaf resolves to an
    /// existing file under the profile directory.
    pub fn from_descriptor(
        descriptor: ProfileDescriptor,
        profile_name: &str,
        root: &Path,
    ) -> Result<Self> {
        let descriptor_path = || root.display().to_string();

        for (field, value) in [
            ("name", &descriptor.metadata.name),
            ("description", &descriptor.metadata.description),
            ("version", &descriptor.metadata.version),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig {
                    message: format!(
                        "profile '{}' metadata missing required field '{}'",
                        profile_name, field
                    ),
                    path: descriptor_path(),
                });
            }
        }

        let TemplateTree::Named(ref entries) = descriptor.templates else {
            return Err(Error::InvalidConfig {
                message: format!("profile '{}' templates must be a mapping", profile_name),
                path: descriptor_path(),
            });
        };
        match entries.get(FLAKE_KEY) {
            Some(TemplateTree::Leaf(_)) => {}
            _ => {
                return Err(Error::InvalidConfig {
                    message: format!(
                        "profile '{}' templates must include a '{}' template path",
                        profile_name, FLAKE_KEY
                    ),
                    path: descriptor_path(),
                })
            }
        }

        let defaults = match descriptor.defaults {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                return Err(Error::InvalidConfig {
                    message: format!("profile '{}' defaults must be an object", profile_name),
                    path: descriptor_path(),
                })
            }
        };

        let profile = Profile {
            metadata: descriptor.metadata,
            templates: descriptor.templates,
            defaults,
            root: root.to_path_buf(),
        };
        profile.validate_template_files()?;
        Ok(profile)
    }

    /// Checks that every leaf anywhere in the template tree (including
    /// inside sequences and nested mappings) references an existing file
    /// under the profile directory.
    fn validate_template_files(&self) -> Result<()> {
        let root = &self.root;
        self.templates.for_each_leaf(&mut |leaf| {
            let template_path = root.join(leaf);
            if !template_path.is_file() {
                return Err(Error::TemplateError {
                    message: format!(
                        "template file not found: {} ({})",
                        leaf,
                        template_path.display()
                    ),
                });
            }
            Ok(())
        })
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            name: self.metadata.name.clone(),
            display_name: self.metadata.display_name().to_string(),
            description: self.metadata.description.clone(),
            version: self.metadata.version.clone(),
            tags: self.metadata.tags.clone(),
            examples: self.metadata.examples.clone(),
        }
    }
}
