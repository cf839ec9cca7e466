//! docfuse utilities
//!
//! Shared helpers for the docfuse workspace: logging setup, layered
//! configuration loading, comment line wrapping and the file plumbing used
//! when documented sources are written back to disk.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod file;
pub mod string;
pub mod config;
pub mod logging;

pub use file::{create_backup, find_source_files, normalize_path, safe_path_join, write_with_parents};
pub use string::{display_width, leading_whitespace, wrap_words, DEFAULT_WRAP_WIDTH};
pub use config::{load_config, merge_configs, ConfigBuilder};

use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Result type used throughout docfuse utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path operation error
    #[error("Path operation error: {0}")]
    PathOperation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Directories and files never worth documenting
pub fn default_exclusion_patterns() -> HashSet<String> {
    [
        // Version control
        ".git",
        ".svn",
        ".hg",
        // Dependencies and build output
        "node_modules",
        "vendor",
        "__pycache__",
        "dist",
        "build",
        "target",
        // Virtual environments
        "venv",
        ".venv",
        // Minified bundles
        "*.min.js",
        // Our own backups
        ".docfuse_backups",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// File extensions per supported language family
pub fn supported_language_extensions() -> HashMap<&'static str, &'static [&'static str]> {
    let mut extensions: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    extensions.insert("python", &["py"]);
    extensions.insert("php", &["php"]);
    extensions.insert("go", &["go"]);
    extensions.insert("javascript", &["js", "jsx", "mjs", "cjs", "ts", "tsx"]);
    extensions
}

/// Detect the language family of a file from its extension
pub fn detect_language(file_path: &Path) -> Option<&'static str> {
    let extension = file_path.extension()?.to_str()?.to_lowercase();

    supported_language_extensions()
        .into_iter()
        .find(|(_, exts)| exts.contains(&extension.as_str()))
        .map(|(language, _)| language)
}

/// Check if a path should be excluded based on patterns
///
/// Plain patterns match any path component exactly; `*.ext` patterns match
/// the file name suffix.
pub fn should_exclude_path(path: &Path, patterns: &HashSet<String>) -> bool {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    patterns.iter().any(|pattern| {
        let pattern = pattern.to_lowercase();
        if let Some(suffix) = pattern.strip_prefix('*') {
            file_name.ends_with(suffix)
        } else {
            path.components()
                .any(|component| component.as_os_str().to_string_lossy().to_lowercase() == pattern)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_detection() {
        assert_eq!(detect_language(&PathBuf::from("app.py")), Some("python"));
        assert_eq!(detect_language(&PathBuf::from("index.PHP")), Some("php"));
        assert_eq!(detect_language(&PathBuf::from("main.go")), Some("go"));
        assert_eq!(detect_language(&PathBuf::from("App.tsx")), Some("javascript"));
        assert_eq!(detect_language(&PathBuf::from("lib.rs")), None);
        assert_eq!(detect_language(&PathBuf::from("Makefile")), None);
    }

    #[test]
    fn test_exclusion_patterns() {
        let patterns = default_exclusion_patterns();

        assert!(should_exclude_path(&PathBuf::from(".git/config"), &patterns));
        assert!(should_exclude_path(&PathBuf::from("web/node_modules/react/index.js"), &patterns));
        assert!(should_exclude_path(&PathBuf::from("static/app.min.js"), &patterns));
        assert!(!should_exclude_path(&PathBuf::from("src/main.py"), &patterns));
        // component match, not substring match
        assert!(!should_exclude_path(&PathBuf::from("src/builder.go"), &patterns));
    }
}
