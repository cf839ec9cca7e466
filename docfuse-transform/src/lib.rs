//! docfuse transform - documentation reassembly and insertion
//!
//! Takes generated documentation for one source file (a file summary plus
//! `(name, docstring)` pairs for classes and functions) and writes it back
//! into the source text as comments, at the right place, with the right
//! indentation and comment syntax for the language.
//!
//! Key pieces:
//! - Indentation prober and per-language comment formatters
//! - Declaration locators: tree-sitter for Python, signature grammars for
//!   Go, PHP and JavaScript/TypeScript
//! - File header insertion that respects existing headers and preambles
//! - One aggregator per language running the insertion stages in order
//! - Chunk fusion and a file/batch engine for callers working on disk

#![warn(clippy::all, clippy::pedantic)]

pub mod aggregators;
pub mod engine;
pub mod format;
pub mod fusion;
pub mod header;
pub mod indent;
pub mod locate;
pub mod types;

// Re-export main types for convenience
pub use aggregators::{aggregator_for, Aggregator, Stage};
pub use engine::{BatchReport, DocumentationEngine, EngineConfig, FileJob, FileOutcome};
pub use format::{CommentFormatter, CommentStyle};
pub use fusion::{fuse_chunks, retain_declared};
pub use header::FileHeaderInserter;
pub use indent::{body_indentation_of, indentation_of, Indentation};
pub use locate::{locator_for, Declaration, DeclarationLocator};
pub use types::{Documentation, DocumentationEntity, EntityKind, InsertionPoint, Language, Placement};

/// Result type for transformation operations
pub type Result<T> = std::result::Result<T, TransformError>;

/// Error types for documentation insertion
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source could not be parsed; fatal for that file only
    #[error("Parse error in {language} source at line {line}: {message}")]
    Parse {
        language: Language,
        line: usize,
        message: String,
    },

    /// No aggregator exists for the requested language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Documentation input could not be read
    #[error("Documentation error: {0}")]
    Documentation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tree-sitter language error
    #[error("Language error: {0}")]
    Language(String),

    /// Declaration pattern failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] docfuse_utils::UtilError),
}

impl From<tree_sitter::LanguageError> for TransformError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        TransformError::Language(format!("{:?}", err))
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Documentation(err.to_string())
    }
}
