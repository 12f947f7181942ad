//! Profile discovery and registry.
//! Scans a templates root for profile bundles, validates each one in
//! isolation and keeps the survivors in a read-only, name-keyed registry.

use crate::constants::PROFILE_FILES;
use crate::envsub::resolve_env_vars;
use crate::error::{Error, Result};
use crate::profile::{Profile, ProfileDescriptor, ProfileSummary};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name-keyed collection of validated profiles. Loaded once at startup (or
/// via an explicit [`reload`](ProfileRegistry::reload)), read-only
/// thereafter; reload takes `&mut self` so no reader can observe it
/// mid-swap.
#[derive(Debug)]
pub struct ProfileRegistry {
    templates_root: PathBuf,
    profiles: BTreeMap<String, Profile>,
}

impl ProfileRegistry {
    /// Loads every profile directory under `templates_root`.
    ///
    /// A failure in one profile (bad descriptor, missing metadata, missing
    /// template file) excludes that profile only; loading continues for the
    /// rest. Only an unreadable templates root is fatal.
    pub fn load(templates_root: &Path) -> Result<Self> {
        let mut registry = ProfileRegistry {
            templates_root: templates_root.to_path_buf(),
            profiles: BTreeMap::new(),
        };
        registry.reload()?;
        Ok(registry)
    }

    /// Re-scans the templates root, replacing the registry contents.
    /// Requires exclusive access; concurrent readers never see a partial
    /// registry.
    pub fn reload(&mut self) -> Result<()> {
        info!("Loading profiles from: {}", self.templates_root.display());

        let entries =
            std::fs::read_dir(&self.templates_root).map_err(|e| Error::Internal {
                message: format!(
                    "failed to read templates root {}: {}",
                    self.templates_root.display(),
                    e
                ),
            })?;

        let mut profiles = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Internal {
                message: format!(
                    "failed to read templates root {}: {}",
                    self.templates_root.display(),
                    e
                ),
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let profile_name = entry.file_name().to_string_lossy().into_owned();

            match load_profile(&path, &profile_name) {
                Ok(profile) => {
                    debug!("Loaded profile: {}", profile_name);
                    profiles.insert(profile_name, profile);
                }
                Err(e) => {
                    warn!("Failed to load profile from {}: {}", profile_name, e);
                }
            }
        }

        info!("Successfully loaded {} profiles", profiles.len());
        self.profiles = profiles;
        Ok(())
    }

    /// Fetches a profile by name.
    ///
    /// # Errors
    /// * `Error::ProfileNotFound` carrying the currently available names
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.profiles.get(name).ok_or_else(|| Error::ProfileNotFound {
            name: name.to_string(),
            available: self.profiles.keys().cloned().collect(),
        })
    }

    /// Metadata summaries of all registered profiles.
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles.values().map(Profile::summary).collect()
    }

    pub fn has(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    pub fn templates_root(&self) -> &Path {
        &self.templates_root
    }
}

/// Reads and validates one profile directory: parse the descriptor (JSON
/// first, YAML fallback), env-substitute the defaults, then run structural
/// validation and template file checks.
fn load_profile(profile_dir: &Path, profile_name: &str) -> Result<Profile> {
    let descriptor_path = PROFILE_FILES
        .iter()
        .map(|name| profile_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::InvalidConfig {
            message: format!("profile descriptor not found for '{}'", profile_name),
            path: profile_dir.display().to_string(),
        })?;

    let content = std::fs::read_to_string(&descriptor_path).map_err(|e| Error::InvalidConfig {
        message: format!("failed to read profile descriptor: {}", e),
        path: descriptor_path.display().to_string(),
    })?;

    let raw: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(&content).map_err(|e| Error::InvalidConfig {
            message: format!("invalid profile descriptor format: {}", e),
            path: descriptor_path.display().to_string(),
        })?,
    };

    // Substitution happens before validation so defaults referencing
    // secrets behave exactly like config files do.
    let resolved = resolve_env_vars(&raw);
    let descriptor: ProfileDescriptor =
        serde_json::from_value(resolved).map_err(|e| Error::InvalidConfig {
            message: format!("invalid profile descriptor: {}", e),
            path: descriptor_path.display().to_string(),
        })?;

    Profile::from_descriptor(descriptor, profile_name, profile_dir)
}
