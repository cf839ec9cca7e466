//! Python declaration locator
//!
//! Uses tree-sitter to find `def` and `class` definitions (decorated and
//! nested ones included) in document order. A definition counts as
//! documented when the first statement of its body is a string expression.

use tree_sitter::{Node, Parser, Tree};

use super::{Declaration, DeclarationLocator};
use crate::indent::{indentation_at, line_start, Indentation};
use crate::types::{EntityKind, InsertionPoint, Language, Placement};
use crate::{Result, TransformError};

/// A `def` or `class` found in Python source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonDefinition {
    pub name: String,
    pub kind: EntityKind,
    pub declaration: Declaration,
}

/// Tree-sitter backed locator for Python
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonLocator;

impl PythonLocator {
    pub fn new() -> Self {
        Self
    }

    /// Parse `code`, failing on any syntax error
    pub fn parse(&self, code: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(tree_sitter_python::language())?;
        let tree = parser.parse(code, None).ok_or_else(|| TransformError::Parse {
            language: Language::Python,
            line: 1,
            message: "parser produced no tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, message) = first_error(root)
                .map(|node| {
                    let message = if node.is_missing() {
                        format!("missing {}", node.kind())
                    } else {
                        "invalid syntax".to_string()
                    };
                    (node.start_position().row + 1, message)
                })
                .unwrap_or((1, "invalid syntax".to_string()));
            return Err(TransformError::Parse {
                language: Language::Python,
                line,
                message,
            });
        }
        Ok(tree)
    }

    /// Every definition in `code`, in document order
    pub fn definitions(&self, code: &str) -> Result<Vec<PythonDefinition>> {
        let tree = self.parse(code)?;
        let mut definitions = Vec::new();
        collect_definitions(tree.root_node(), code, &mut definitions);
        Ok(definitions)
    }
}

impl DeclarationLocator for PythonLocator {
    fn find(&self, code: &str, name: &str, kind: EntityKind) -> Result<Option<Declaration>> {
        Ok(self
            .definitions(code)?
            .into_iter()
            .find(|def| def.kind == kind && def.name == name)
            .map(|def| def.declaration))
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(Node::has_error)
        .find_map(first_error)
}

fn collect_definitions(node: Node<'_>, code: &str, out: &mut Vec<PythonDefinition>) {
    let kind = match node.kind() {
        "function_definition" => Some(EntityKind::Method),
        "class_definition" => Some(EntityKind::Class),
        _ => None,
    };
    if let Some(kind) = kind {
        if let Some(def) = definition(node, code, kind) {
            out.push(def);
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_definitions(child, code, out);
    }
}

fn definition(node: Node<'_>, code: &str, kind: EntityKind) -> Option<PythonDefinition> {
    let name = node
        .child_by_field_name("name")?
        .utf8_text(code.as_bytes())
        .ok()?
        .to_string();
    let body = node.child_by_field_name("body")?;

    let mut cursor = body.walk();
    let first_statement = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;

    let already_documented = is_docstring(first_statement);
    let mut cursor = node.walk();
    let colon = node
        .children(&mut cursor)
        .filter(|child| child.kind() == ":" && child.end_byte() <= body.start_byte())
        .last();
    let header_end = colon.map_or(body.start_byte(), |colon| colon.end_byte());
    let header_row = colon.map_or(node.start_position().row, |colon| colon.end_position().row);
    let statement_start = first_statement.start_byte();

    let insertion = if first_statement.start_position().row == header_row {
        // `def f(): return 1` keeps its body on the header line
        InsertionPoint {
            offset: statement_start,
            indentation: indentation_at(code, node.start_byte()).deeper(),
            placement: Placement::MidLine,
            already_documented,
        }
    } else {
        let start = line_start(code, statement_start);
        InsertionPoint {
            offset: start,
            indentation: Indentation::of_line(&code[start..statement_start]),
            placement: Placement::LineStart,
            already_documented,
        }
    };

    Some(PythonDefinition {
        name,
        kind,
        declaration: Declaration {
            span: node.start_byte()..header_end,
            insertion,
        },
    })
}

fn is_docstring(statement: Node<'_>) -> bool {
    statement.kind() == "expression_statement"
        && statement
            .named_child(0)
            .is_some_and(|expr| matches!(expr.kind(), "string" | "concatenated_string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(code: &str, name: &str, kind: EntityKind) -> Option<Declaration> {
        PythonLocator::new().find(code, name, kind).unwrap()
    }

    #[test]
    fn test_finds_function_body_start() {
        let code = "def greet(name):\n    return f\"hi {name}\"\n";
        let decl = find(code, "greet", EntityKind::Method).unwrap();
        assert_eq!(&code[decl.span.clone()], "def greet(name):");
        assert_eq!(decl.insertion.offset, code.find("    return").unwrap());
        assert_eq!(decl.insertion.indentation.width(), 4);
        assert_eq!(decl.insertion.placement, Placement::LineStart);
        assert!(!decl.already_documented());
    }

    #[test]
    fn test_detects_existing_docstring() {
        let code = "class A:\n    '''Doc.'''\n    x = 1\n";
        assert!(find(code, "A", EntityKind::Class).unwrap().already_documented());
    }

    #[test]
    fn test_comment_before_body_is_not_a_docstring() {
        let code = "def f():\n    # note\n    return 1\n";
        let decl = find(code, "f", EntityKind::Method).unwrap();
        assert!(!decl.already_documented());
        assert_eq!(decl.insertion.offset, code.find("    return").unwrap());
    }

    #[test]
    fn test_nested_and_decorated_definitions() {
        let code = "class Outer:\n    @staticmethod\n    def inner():\n        pass\n";
        let decl = find(code, "inner", EntityKind::Method).unwrap();
        assert_eq!(decl.insertion.indentation.width(), 8);
        assert!(find(code, "inner", EntityKind::Class).is_none());
        assert!(find(code, "missing", EntityKind::Method).is_none());
    }

    #[test]
    fn test_same_line_body() {
        let code = "def one(): return 1\n";
        let decl = find(code, "one", EntityKind::Method).unwrap();
        assert_eq!(decl.insertion.placement, Placement::MidLine);
        assert_eq!(decl.insertion.offset, code.find("return").unwrap());
        assert_eq!(decl.insertion.indentation.as_str(), "    ");
    }

    #[test]
    fn test_same_line_body_after_multi_line_signature() {
        let code = "def f(\n    x: int,\n) -> int: ...\n";
        let decl = find(code, "f", EntityKind::Method).unwrap();
        assert_eq!(decl.insertion.placement, Placement::MidLine);
        assert_eq!(decl.insertion.offset, code.find("...").unwrap());
        assert_eq!(&code[decl.span.clone()], "def f(\n    x: int,\n) -> int:");
    }

    #[test]
    fn test_first_definition_wins() {
        let code = "def dup():\n    '''Doc.'''\n\ndef dup():\n    pass\n";
        let decl = find(code, "dup", EntityKind::Method).unwrap();
        assert_eq!(decl.span.start, 0);
        assert!(decl.already_documented());
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = PythonLocator::new()
            .find("x = 1\ndef broken(:\n    pass\n", "broken", EntityKind::Method)
            .unwrap_err();
        match err {
            TransformError::Parse { language, line, .. } => {
                assert_eq!(language, Language::Python);
                assert!(line >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
