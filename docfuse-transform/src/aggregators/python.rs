//! Python aggregator
//!
//! Docstrings become the first statement of each `def` and `class` body.
//! The source must parse: a syntax error anywhere fails the whole file
//! before anything is inserted.

use super::{insert_located, Aggregator};
use crate::format::CommentFormatter;
use crate::header::FileHeaderInserter;
use crate::locate::PythonLocator;
use crate::types::{DocumentationEntity, EntityKind, Language};
use crate::Result;

pub struct PythonAggregator {
    header: FileHeaderInserter,
    formatter: CommentFormatter,
    locator: PythonLocator,
}

impl PythonAggregator {
    pub fn new() -> Self {
        Self::with_max_width(docfuse_utils::DEFAULT_WRAP_WIDTH)
    }

    pub fn with_max_width(max_width: usize) -> Self {
        let formatter = CommentFormatter::for_language(Language::Python).with_max_width(max_width);
        Self {
            header: FileHeaderInserter::new(Language::Python, formatter.clone()),
            formatter,
            locator: PythonLocator::new(),
        }
    }
}

impl Default for PythonAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for PythonAggregator {
    fn language(&self) -> Language {
        Language::Python
    }

    fn header(&self) -> &FileHeaderInserter {
        &self.header
    }

    fn validate(&self, code: &str) -> Result<()> {
        self.locator.parse(code).map(|_| ())
    }

    // The module docstring is a string statement, never a definition, so
    // the whole file is searched.
    fn document_entities(
        &self,
        code: &str,
        _floor: usize,
        kind: EntityKind,
        entities: &[&DocumentationEntity],
    ) -> Result<String> {
        if entities.is_empty() {
            return Ok(code.to_string());
        }
        let definitions = self.locator.definitions(code)?;
        let result = insert_located(code, 0, entities, &self.formatter, |_, entity| {
            Ok(definitions
                .iter()
                .find(|def| def.kind == kind && def.name == entity.name)
                .map(|def| def.declaration.clone()))
        })?;
        Ok(result.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Documentation;
    use crate::TransformError;

    fn document(doc: &Documentation, code: &str) -> String {
        PythonAggregator::new().document(doc, code).unwrap()
    }

    #[test]
    fn test_function_docstring() {
        let mut doc = Documentation::default();
        doc.push(DocumentationEntity::method("greet", "Greets."));
        let out = document(&doc, "def greet(name):\n    return name\n");
        assert_eq!(out, "def greet(name):\n    \"\"\"Greets.\"\"\"\n    return name\n");
    }

    #[test]
    fn test_methods_and_classes_in_one_pass() {
        let mut doc = Documentation::default();
        doc.file_docstring = Some("Shapes.".into());
        doc.push(DocumentationEntity::class("Square", "A square."));
        doc.push(DocumentationEntity::method("area", "Area of the square."));
        let code = "class Square:\n    def area(self):\n        return 4\n";
        let out = document(&doc, code);
        assert_eq!(
            out,
            "\"\"\"Shapes.\"\"\"\n\nclass Square:\n    \"\"\"A square.\"\"\"\n    def area(self):\n        \"\"\"Area of the square.\"\"\"\n        return 4\n"
        );
    }

    #[test]
    fn test_existing_docstring_is_kept() {
        let mut doc = Documentation::default();
        doc.push(DocumentationEntity::method("f", "New."));
        let code = "def f():\n    \"\"\"Old.\"\"\"\n    pass\n";
        assert_eq!(document(&doc, code), code);
    }

    #[test]
    fn test_same_line_body_is_split() {
        let mut doc = Documentation::default();
        doc.push(DocumentationEntity::method("one", "Returns one."));
        let out = document(&doc, "def one(): return 1\n");
        assert_eq!(out, "def one():\n    \"\"\"Returns one.\"\"\"\n    return 1\n");
    }

    #[test]
    fn test_docstring_ending_in_quotes_parses() {
        let mut doc = Documentation::default();
        doc.push(DocumentationEntity::method("f", "Wraps text in \"\"\""));
        let out = document(&doc, "def f():\n    pass\n");
        assert!(PythonLocator::new().parse(&out).is_ok(), "{}", out);
        assert!(PythonLocator::new().definitions(&out).unwrap()[0].declaration.already_documented());
    }

    #[test]
    fn test_tab_indented_body() {
        let mut doc = Documentation::default();
        doc.push(DocumentationEntity::method("f", "Doc."));
        let out = document(&doc, "def f():\n\tpass\n");
        assert_eq!(out, "def f():\n\t\"\"\"Doc.\"\"\"\n\tpass\n");
    }

    #[test]
    fn test_unparseable_source_fails_without_output() {
        let mut doc = Documentation::default();
        doc.file_docstring = Some("Header.".into());
        let err = PythonAggregator::new().document(&doc, "def (:\n").unwrap_err();
        assert!(matches!(err, TransformError::Parse { language: Language::Python, .. }));
    }
}
