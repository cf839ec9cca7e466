//! Documentation fusion
//!
//! Long files are summarized in chunks, each producing its own
//! [`Documentation`]. These helpers merge the chunk results and drop entries
//! for declarations that do not exist in the source.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::locate::locator_for;
use crate::types::{Documentation, EntityKind, Language};

/// Merge per-chunk documentation in order.
///
/// The first docstring per `(kind, name)` wins, as does the first file
/// docstring with visible text.
pub fn fuse_chunks<I>(chunks: I) -> Documentation
where
    I: IntoIterator<Item = Documentation>,
{
    let mut fused = Documentation::default();
    let mut seen: HashSet<(EntityKind, String)> = HashSet::new();

    for chunk in chunks {
        if fused.file_text().is_none() {
            if let Some(text) = chunk.file_text() {
                fused.file_docstring = Some(text.to_string());
            }
        }
        for entity in chunk.classes.into_iter().chain(chunk.methods) {
            if seen.insert((entity.kind, entity.name.clone())) {
                fused.push(entity);
            }
        }
    }

    fused
}

/// Keep only entities whose declaration can be found in `code`.
///
/// Returns the filtered documentation and the `(kind, name)` pairs dropped.
/// When the source cannot be searched (a Python syntax error) everything is
/// kept.
pub fn retain_declared(
    documentation: &Documentation,
    language: Language,
    code: &str,
) -> (Documentation, Vec<(EntityKind, String)>) {
    let locator = locator_for(language);
    let mut kept = Documentation {
        file_docstring: documentation.file_docstring.clone(),
        ..Documentation::default()
    };
    let mut dropped = Vec::new();

    let entities = documentation.classes.iter().chain(&documentation.methods);
    for entity in entities {
        match locator.find(code, &entity.name, entity.kind) {
            Ok(Some(_)) => kept.push(entity.clone()),
            Ok(None) => {
                debug!(name = %entity.name, kind = %entity.kind, "dropping undeclared entity");
                dropped.push((entity.kind, entity.name.clone()));
            }
            Err(e) => {
                warn!("Cannot check declarations in {} source: {}", language, e);
                return (documentation.clone(), Vec::new());
            }
        }
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentationEntity;

    fn chunk(file: Option<&str>, methods: &[(&str, &str)]) -> Documentation {
        let mut doc = Documentation {
            file_docstring: file.map(String::from),
            ..Documentation::default()
        };
        for (name, text) in methods {
            doc.push(DocumentationEntity::method(*name, *text));
        }
        doc
    }

    #[test]
    fn test_first_docstring_wins() {
        let fused = fuse_chunks(vec![
            chunk(Some(" "), &[("run", "first")]),
            chunk(Some("Module summary."), &[("run", "second"), ("stop", "only")]),
            chunk(Some("Later summary."), &[]),
        ]);
        assert_eq!(fused.file_docstring.as_deref(), Some("Module summary."));
        assert_eq!(fused.methods[0], DocumentationEntity::method("run", "first"));
        assert_eq!(fused.methods.len(), 2);
    }

    #[test]
    fn test_same_name_different_kind_both_kept() {
        let mut a = Documentation::default();
        a.push(DocumentationEntity::class("Parser", "Class."));
        a.push(DocumentationEntity::method("Parser", "Factory."));
        let fused = fuse_chunks(vec![a]);
        assert_eq!(fused.classes.len(), 1);
        assert_eq!(fused.methods.len(), 1);
    }

    #[test]
    fn test_retain_declared_drops_unknown_names() {
        let mut doc = chunk(Some("Doc."), &[("Add", "Adds."), ("Ghost", "Invented.")]);
        doc.push(DocumentationEntity::class("Calc", "Calculator."));
        let code = "package m\n\ntype Calc struct{}\n\nfunc Add() {}\n";
        let (kept, dropped) = retain_declared(&doc, Language::Go, code);
        assert_eq!(kept.methods, vec![DocumentationEntity::method("Add", "Adds.")]);
        assert_eq!(kept.classes.len(), 1);
        assert_eq!(kept.file_docstring.as_deref(), Some("Doc."));
        assert_eq!(dropped, vec![(EntityKind::Method, "Ghost".to_string())]);
    }

    #[test]
    fn test_unparseable_python_keeps_everything() {
        let doc = chunk(None, &[("ghost", "Invented.")]);
        let (kept, dropped) = retain_declared(&doc, Language::Python, "def (:\n");
        assert_eq!(kept, doc);
        assert!(dropped.is_empty());
    }
}
