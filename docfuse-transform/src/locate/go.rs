//! Go declaration locator
//!
//! Functions and methods match `func [(receiver)] Name[type params](`, types
//! match `type Name[type params] struct|interface {`. A declaration is
//! documented when one of the three lines above it starts a `//` comment or
//! closes a `*/` block, blank lines included.

use regex::Regex;

use super::{insertion_above_line, preceding_lines, Declaration, DeclarationLocator};
use crate::indent::line_end;
use crate::types::EntityKind;
use crate::Result;

/// Lines inspected above a declaration for an existing comment
pub const DOC_LOOKBACK_LINES: usize = 3;

/// Signature-pattern locator for Go
#[derive(Debug, Default, Clone, Copy)]
pub struct GoLocator;

impl GoLocator {
    pub fn new() -> Self {
        Self
    }

    fn pattern(name: &str, kind: EntityKind) -> Result<Regex> {
        let name = regex::escape(name);
        let pattern = match kind {
            EntityKind::Method => format!(
                r"(?m)^[ \t]*func[ \t]*(?:\([^)]*\)[ \t]*)?{}[ \t]*(?:\[[^\]\n]*\][ \t]*)?\(",
                name
            ),
            EntityKind::Class => format!(
                r"(?m)^[ \t]*type[ \t]+{}[ \t]*(?:\[[^\]\n]*\][ \t]*)?(?:struct|interface)[ \t]*\{{",
                name
            ),
        };
        Ok(Regex::new(&pattern)?)
    }
}

impl DeclarationLocator for GoLocator {
    fn find(&self, code: &str, name: &str, kind: EntityKind) -> Result<Option<Declaration>> {
        let Some(found) = Self::pattern(name, kind)?.find(code) else {
            return Ok(None);
        };
        let keyword = found.start() + (found.as_str().len() - found.as_str().trim_start().len());
        let documented = is_documented(code, keyword);

        Ok(Some(Declaration {
            span: keyword..line_end(code, keyword),
            insertion: insertion_above_line(code, keyword, documented),
        }))
    }
}

fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("//") || trimmed.contains("*/")
}

fn is_documented(code: &str, offset: usize) -> bool {
    preceding_lines(code, offset, DOC_LOOKBACK_LINES)
        .into_iter()
        .any(is_comment_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Placement;

    fn find(code: &str, name: &str, kind: EntityKind) -> Option<Declaration> {
        GoLocator::new().find(code, name, kind).unwrap()
    }

    #[test]
    fn test_plain_function() {
        let code = "package m\n\nfunc Add(a, b int) int {\n\treturn a + b\n}\n";
        let decl = find(code, "Add", EntityKind::Method).unwrap();
        assert_eq!(&code[decl.span.clone()], "func Add(a, b int) int {");
        assert_eq!(decl.insertion.offset, code.find("func").unwrap());
        assert_eq!(decl.insertion.placement, Placement::LineStart);
        assert!(!decl.already_documented());
    }

    #[test]
    fn test_method_with_receiver_and_type_params() {
        let code = "func (s *Stack[T]) Push(v T) {}\nfunc Map[T any](xs []T) {}\n";
        assert!(find(code, "Push", EntityKind::Method).is_some());
        assert!(find(code, "Map", EntityKind::Method).is_some());
        assert!(find(code, "Pus", EntityKind::Method).is_none());
    }

    #[test]
    fn test_types() {
        let code = "type Server struct {\n}\n\ntype Store[K comparable] interface {\n}\n";
        assert!(find(code, "Server", EntityKind::Class).is_some());
        assert!(find(code, "Store", EntityKind::Class).is_some());
        assert!(find(code, "Server", EntityKind::Method).is_none());
    }

    #[test]
    fn test_existing_comment_directly_above() {
        let code = "// Add adds.\nfunc Add() {}\n\n/* Sub\n subtracts. */\nfunc Sub() {}\n";
        assert!(find(code, "Add", EntityKind::Method).unwrap().already_documented());
        assert!(find(code, "Sub", EntityKind::Method).unwrap().already_documented());
    }

    #[test]
    fn test_comment_across_blank_line_counts() {
        let code = "// A does a thing.\n\nfunc A() {}\n";
        assert!(find(code, "A", EntityKind::Method).unwrap().already_documented());
        let code = "// far\n\n\n\nfunc B() {}\n";
        assert!(!find(code, "B", EntityKind::Method).unwrap().already_documented());
    }

    #[test]
    fn test_lookback_is_three_lines() {
        let code = "// note\nvar x = 1\nvar y = 2\nfunc Near() {}\nvar z = 3\nfunc Far() {}\n";
        assert!(find(code, "Near", EntityKind::Method).unwrap().already_documented());
        assert!(!find(code, "Far", EntityKind::Method).unwrap().already_documented());
    }

    #[test]
    fn test_indented_declaration_keeps_indentation() {
        let code = "func outer() {\n\ttype inner struct {}\n}\n";
        let decl = find(code, "inner", EntityKind::Class).unwrap();
        assert_eq!(decl.insertion.indentation.as_str(), "\t");
        assert_eq!(&code[decl.span.clone()], "type inner struct {}");
    }
}
