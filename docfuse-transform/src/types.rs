//! Documentation model and insertion types
//!
//! The documentation for one source file arrives as JSON in the shape
//! produced by the summarizer:
//!
//! ```json
//! {
//!   "file_docstring": "...",
//!   "classes": [{"class_name": "...", "class_docstring": "..."}],
//!   "methods": [{"method_name": "...", "method_docstring": "..."}]
//! }
//! ```
//!
//! Any of the keys may be missing or `null`. Entries lacking a name or a
//! docstring are dropped while reading, so the rest of the crate only ever
//! sees complete entities.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::indent::Indentation;
use crate::{Result, TransformError};

/// Source language families with an aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Php,
    Go,
    /// JavaScript and TypeScript share one aggregator
    JavaScript,
}

impl Language {
    /// Get all supported languages
    pub fn all() -> Vec<Language> {
        vec![Language::Python, Language::Php, Language::Go, Language::JavaScript]
    }

    /// Canonical lowercase name, also the key used by the utilities crate
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Php => "php",
            Language::Go => "go",
            Language::JavaScript => "javascript",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Php => "PHP",
            Language::Go => "Go",
            Language::JavaScript => "JavaScript/TypeScript",
        }
    }

    /// Map a file extension (without the dot) to its language family
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "py" => Some(Language::Python),
            "php" => Some(Language::Php),
            "go" => Some(Language::Go),
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Detect the language of a path from its extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        docfuse_utils::detect_language(path).and_then(|name| name.parse().ok())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "php" => Ok(Language::Php),
            "go" | "golang" => Ok(Language::Go),
            "javascript" | "js" | "typescript" | "ts" | "jsx" | "tsx" => Ok(Language::JavaScript),
            other => Err(TransformError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Which list an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Class, struct, interface, trait or enum
    Class,
    /// Function or method
    Method,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Method => "method",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named declaration with the docstring to attach to it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentationEntity {
    pub name: String,
    pub kind: EntityKind,
    pub docstring: String,
}

impl DocumentationEntity {
    pub fn new(name: impl Into<String>, kind: EntityKind, docstring: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            docstring: docstring.into(),
        }
    }

    pub fn class(name: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self::new(name, EntityKind::Class, docstring)
    }

    pub fn method(name: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self::new(name, EntityKind::Method, docstring)
    }

    /// Whether the docstring has any visible text
    pub fn has_text(&self) -> bool {
        !self.docstring.trim().is_empty()
    }
}

/// Documentation for one source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocumentation", into = "RawDocumentation")]
pub struct Documentation {
    pub file_docstring: Option<String>,
    pub classes: Vec<DocumentationEntity>,
    pub methods: Vec<DocumentationEntity>,
}

impl Documentation {
    /// Parse the JSON documentation format
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a documentation file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| {
            TransformError::Documentation(format!("{}: {}", path.display(), e))
        })
    }

    /// Serialize back to the JSON documentation format
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add an entity to the list matching its kind
    pub fn push(&mut self, entity: DocumentationEntity) {
        match entity.kind {
            EntityKind::Class => self.classes.push(entity),
            EntityKind::Method => self.methods.push(entity),
        }
    }

    /// All entities of one kind, in input order
    pub fn entities(&self, kind: EntityKind) -> &[DocumentationEntity] {
        match kind {
            EntityKind::Class => &self.classes,
            EntityKind::Method => &self.methods,
        }
    }

    /// Entities of one kind that can be inserted: the first entry per name
    /// wins and entries with a blank docstring are skipped.
    pub fn insertable(&self, kind: EntityKind) -> Vec<&DocumentationEntity> {
        let mut seen = HashSet::new();
        self.entities(kind)
            .iter()
            .filter(|entity| seen.insert(entity.name.as_str()))
            .filter(|entity| entity.has_text())
            .collect()
    }

    /// The file docstring when it has visible text
    pub fn file_text(&self) -> Option<&str> {
        self.file_docstring
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Nothing to insert at all
    pub fn is_empty(&self) -> bool {
        self.file_text().is_none()
            && self.insertable(EntityKind::Class).is_empty()
            && self.insertable(EntityKind::Method).is_empty()
    }
}

/// Wire shape of the documentation JSON
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawDocumentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_docstring: Option<String>,
    #[serde(default)]
    classes: Option<Vec<RawClass>>,
    #[serde(default)]
    methods: Option<Vec<RawMethod>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawClass {
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    class_docstring: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawMethod {
    #[serde(default)]
    method_name: Option<String>,
    #[serde(default)]
    method_docstring: Option<String>,
}

impl From<RawDocumentation> for Documentation {
    fn from(raw: RawDocumentation) -> Self {
        let classes = raw
            .classes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| match (c.class_name, c.class_docstring) {
                (Some(name), Some(doc)) if !name.trim().is_empty() => {
                    Some(DocumentationEntity::class(name.trim(), doc))
                }
                _ => None,
            })
            .collect();
        let methods = raw
            .methods
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| match (m.method_name, m.method_docstring) {
                (Some(name), Some(doc)) if !name.trim().is_empty() => {
                    Some(DocumentationEntity::method(name.trim(), doc))
                }
                _ => None,
            })
            .collect();

        Documentation {
            file_docstring: raw.file_docstring,
            classes,
            methods,
        }
    }
}

impl From<Documentation> for RawDocumentation {
    fn from(doc: Documentation) -> Self {
        RawDocumentation {
            file_docstring: doc.file_docstring,
            classes: Some(
                doc.classes
                    .into_iter()
                    .map(|c| RawClass {
                        class_name: Some(c.name),
                        class_docstring: Some(c.docstring),
                    })
                    .collect(),
            ),
            methods: Some(
                doc.methods
                    .into_iter()
                    .map(|m| RawMethod {
                        method_name: Some(m.name),
                        method_docstring: Some(m.docstring),
                    })
                    .collect(),
            ),
        }
    }
}

/// How inserted comment lines join the surrounding text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Offset is the start of a line; the block goes in as whole lines
    LineStart,
    /// Offset is mid-line; the line is split around the block
    MidLine,
}

/// Where a comment block goes for one declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Byte offset into the text the declaration was located in
    pub offset: usize,
    pub indentation: Indentation,
    pub placement: Placement,
    /// An existing comment or docstring already documents the declaration
    pub already_documented: bool,
}

impl InsertionPoint {
    /// Render `block` (already indented lines) for this point
    pub fn render(&self, block: &str) -> String {
        match self.placement {
            Placement::LineStart => format!("{}\n", block),
            Placement::MidLine => format!("\n{}\n{}", block, self.indentation.as_str()),
        }
    }
}
