//! Template tree walking and file generation.
//! Traverses a profile's template tree depth-first in tree order, renders
//! each leaf against the request context and hands the result to the atomic
//! writer in skip-if-exists mode.

use crate::constants::TEMPLATE_SUFFIX;
use crate::error::Result;
use crate::fsops::{confine_path, safe_write};
use crate::profile::Profile;
use crate::renderer::TemplateRenderer;
use log::debug;
use std::path::{Path, PathBuf};

/// Strips the template suffix from a relative path, leaving non-template
/// names untouched.
pub fn strip_template_suffix(path: &str) -> &str {
    path.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(path)
}

/// Renders every leaf of the profile's template tree into the project root.
///
/// Destinations are confined to the project root up front, before anything
/// is written: an escaping path fails the whole generation step with zero
/// files on disk, it never skips just the offending leaf.
///
/// # Returns
/// Destination paths that were actually written; leaves skipped because the
/// destination already existed are excluded.
pub fn generate_files(
    profile: &Profile,
    context: &serde_json::Value,
    project_root: &Path,
    renderer: &dyn TemplateRenderer,
) -> Result<Vec<PathBuf>> {
    // First pass: resolve and confine every destination. This is the
    // security boundary, so it runs before any file is materialized.
    let mut planned: Vec<(PathBuf, PathBuf)> = Vec::new();
    profile.templates.for_each_leaf(&mut |leaf| {
        let source = profile.root.join(leaf);
        let destination = confine_path(project_root, Path::new(strip_template_suffix(leaf)))?;
        planned.push((source, destination));
        Ok(())
    })?;

    // Second pass: render and write, depth-first in tree order.
    let mut files_created = Vec::new();
    for (source, destination) in planned {
        let content = renderer.render_file(&source, context)?;
        let result = safe_write(&destination, &content, true);
        if result.written {
            debug!("Created file: {}", destination.display());
            files_created.push(destination);
        } else {
            debug!("Skipped existing file: {}", destination.display());
        }
    }

    Ok(files_created)
}
