//! File system helpers
//!
//! Discovery of documentable sources and the write side of the pipeline:
//! documented output is written next to, or over, the original file.

use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory that receives copies of files overwritten in place
pub const BACKUP_DIR_NAME: &str = ".docfuse_backups";

/// Safely join paths, preventing directory traversal
pub fn safe_path_join(base: &Path, relative: &Path) -> crate::Result<PathBuf> {
    let normalized = normalize_path(relative);

    if normalized.is_absolute()
        || normalized
            .components()
            .any(|component| matches!(component, std::path::Component::ParentDir))
    {
        return Err(crate::UtilError::PathOperation(format!(
            "Unsafe path join attempted: {:?} + {:?}",
            base, relative
        )));
    }

    Ok(base.join(normalized))
}

/// Normalize path lexically (`a/./b/../c` becomes `a/c`)
pub fn normalize_path(path: &Path) -> PathBuf {
    path_clean::clean(path)
}

/// Create a timestamped backup of a file in a sibling backup directory
pub fn create_backup(file_path: &Path) -> crate::Result<PathBuf> {
    if !file_path.exists() {
        return Err(crate::UtilError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File does not exist",
        )));
    }

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let backup_name = format!(
        "{}.backup.{}",
        file_path
            .file_name()
            .ok_or_else(|| crate::UtilError::PathOperation("Invalid file name".to_string()))?
            .to_string_lossy(),
        timestamp
    );

    let backup_dir = file_path
        .parent()
        .ok_or_else(|| crate::UtilError::PathOperation("Cannot determine parent directory".to_string()))?
        .join(BACKUP_DIR_NAME);

    fs::create_dir_all(&backup_dir)?;

    let backup_path = backup_dir.join(backup_name);
    fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}

/// Write `contents` to `path`, creating missing parent directories
pub fn write_with_parents(path: &Path, contents: &str) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Find files under `root` whose language is supported
///
/// Without `recursive` only the direct children of `root` are considered.
/// Results are sorted so batch runs are reproducible.
pub fn find_source_files(
    root: &Path,
    recursive: bool,
    exclude_patterns: &HashSet<String>,
) -> crate::Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            entry.depth() == 0 || !crate::should_exclude_path(relative, exclude_patterns)
        });

    for entry in walker {
        let entry = entry.map_err(|e| crate::UtilError::PathOperation(e.to_string()))?;
        if entry.file_type().is_file() && crate::detect_language(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
