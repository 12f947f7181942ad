//! Crash-safe, non-destructive file materialization for shellforge.
//! All writes go through a sibling temporary file followed by a rename, so a
//! destination is never observed in a partially written state. Destination
//! paths are confined to the project root before anything touches disk.

use crate::error::{Error, Result};
use log::{debug, error};
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Outcome of a [`safe_write`] attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

/// Why a [`safe_write`] did not write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    /// The destination already exists and skip-if-exists was requested
    Exists,
    /// The write attempt failed; callers decide severity
    Error,
}

fn classify_io(err: std::io::Error, path: &Path, action: &str) -> Error {
    if err.kind() == ErrorKind::PermissionDenied {
        Error::PermissionDenied {
            message: format!("cannot {}", action),
            path: path.display().to_string(),
        }
    } else {
        Error::Filesystem {
            message: format!("failed to {}: {}", action, err),
            path: path.display().to_string(),
        }
    }
}

/// Recursively creates a directory; idempotent if it already exists.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| classify_io(e, dir, "create directory"))?;
    debug!("Directory ensured: {}", dir.display());
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Atomically writes `content` to `path`: ensures the parent directory,
/// writes a sibling temporary file, then renames it onto the final path. A
/// crash mid-write leaves either the prior content or nothing, never a
/// truncated mix.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_directory(parent)?;

    let mut tmp =
        NamedTempFile::new_in(parent).map_err(|e| classify_io(e, path, "create temporary file"))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| classify_io(e, path, "write file"))?;
    tmp.persist(path).map_err(|e| classify_io(e.error, path, "write file"))?;

    debug!("File written: {}", path.display());
    Ok(())
}

/// Non-destructive write. Checks existence first; if present and
/// `skip_if_exists` is set, returns without touching the file. Any failure
/// during the attempt is caught and reported in the result rather than
/// propagated, so callers can decide severity.
pub fn safe_write(path: &Path, content: &str, skip_if_exists: bool) -> WriteResult {
    if skip_if_exists && file_exists(path) {
        debug!("File exists, skipping: {}", path.display());
        return WriteResult { written: false, reason: Some(SkipReason::Exists) };
    }

    match write_file(path, content) {
        Ok(()) => WriteResult { written: true, reason: None },
        Err(e) => {
            error!("Error in safe_write: {}", e);
            WriteResult { written: false, reason: Some(SkipReason::Error) }
        }
    }
}

/// Copies a file by reading it fully and writing atomically.
pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    let content =
        fs::read_to_string(source).map_err(|e| classify_io(e, source, "read file for copy"))?;
    write_file(dest, &content)?;
    debug!("File copied: {} -> {}", source.display(), dest.display());
    Ok(())
}

/// Sets owner/group/other execute bits on a file.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| classify_io(e, path, "make file executable"))?;
    }
    debug!("File made executable: {}", path.display());
    Ok(())
}

/// Lexically normalizes a path, resolving `.` and `..` segments. Returns
/// None when a `..` would climb past the path's root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                normalized.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                normalized.push(part);
                depth += 1;
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Some(normalized)
}

/// Confines a candidate destination to the project root. This is a security
/// boundary: a failure here aborts the entire generation step.
///
/// # Errors
/// * `Error::PathEscape` when the normalized candidate contains a traversal
///   past the root or does not lie under the normalized project root
pub fn confine_path(project_root: &Path, candidate: &Path) -> Result<PathBuf> {
    let root = normalize(project_root).ok_or_else(|| Error::PathEscape {
        path: project_root.display().to_string(),
        project_root: project_root.display().to_string(),
    })?;
    let resolved = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project_root.join(candidate)
    };
    let normalized = normalize(&resolved).ok_or_else(|| Error::PathEscape {
        path: candidate.display().to_string(),
        project_root: root.display().to_string(),
    })?;

    if !normalized.starts_with(&root) {
        return Err(Error::PathEscape {
            path: candidate.display().to_string(),
            project_root: root.display().to_string(),
        });
    }

    Ok(normalized)
}
