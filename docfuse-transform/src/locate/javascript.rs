//! JavaScript and TypeScript declaration locator
//!
//! Functions are looked up in two passes. The conventional pass matches
//! `function name(` declarations and method shorthand inside classes and
//! object literals; the arrow pass matches `name = (...) =>` bindings and
//! class fields. Arrow detection is a heuristic: annotations containing `=`
//! or parameter lists with nested parentheses are not recognized.
//!
//! Comments always go on their own lines above the declaration, after any
//! `@decorator` lines are taken into account. A declaration is documented
//! when the nearest non-blank line above it ends a `*/` block or is a `//`
//! comment.

use regex::Regex;

use super::{insertion_above_line, Declaration, DeclarationLocator, ModifierGrammar};
use crate::indent::{line_end, line_start};
use crate::types::EntityKind;
use crate::Result;

const MODIFIERS: ModifierGrammar = ModifierGrammar {
    keywords: &[
        "export", "default", "declare", "abstract", "async", "static", "public", "private",
        "protected", "readonly", "override", "const", "let", "var", "get", "set",
    ],
    attribute_prefixes: &["@"],
};

/// Method shorthand modifiers allowed in front of the name on the same line
const SHORTHAND_MODIFIERS: &str =
    "static|async|public|private|protected|readonly|override|abstract|get|set";

/// Which function forms to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionPass {
    /// `function name(` and `name(...) {` shorthand
    Conventional,
    /// `name = (...) =>` and `name = async x =>`
    Arrow,
}

/// Signature-pattern locator for JavaScript and TypeScript
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaScriptLocator;

impl JavaScriptLocator {
    pub fn new() -> Self {
        Self
    }

    /// Locate a function using one pass only
    pub fn find_function(&self, code: &str, name: &str, pass: FunctionPass) -> Result<Option<Declaration>> {
        let name = regex::escape(name);
        // `decl` marks where the declaration starts, `name` the identifier
        let patterns = match pass {
            FunctionPass::Conventional => vec![
                format!(r"\b(?P<decl>)function(?:\s*\*\s*|\s+)(?P<name>{})\s*(?:<[^>\n]*>)?\s*\(", name),
                format!(
                    r"(?m)^[ \t]*(?P<decl>)(?:(?:{})[ \t]+)*\*?[ \t]*(?P<name>{})[ \t]*(?:<[^>\n]*>)?[ \t]*\([^)]*\)[ \t]*(?::[^{{;\n]*)?\{{",
                    SHORTHAND_MODIFIERS, name
                ),
            ],
            FunctionPass::Arrow => vec![format!(
                r"(?:^|[^\w$])(?P<decl>)(?P<name>{})[ \t]*(?::[^=\n]+)?=[ \t]*(?:async[ \t]+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)[ \t]*(?::[^=\n]+)?=>",
                name
            )],
        };

        // The earliest match across the pass's patterns wins
        let mut earliest: Option<usize> = None;
        for pattern in &patterns {
            let regex = Regex::new(pattern)?;
            let start = regex
                .captures_iter(code)
                .filter(|caps| caps.name("name").is_some_and(|m| !is_control_keyword(code, m.start())))
                .find_map(|caps| caps.name("decl").map(|m| m.start()));
            if let Some(start) = start {
                earliest = Some(earliest.map_or(start, |e| e.min(start)));
            }
        }
        Ok(earliest.map(|offset| declaration_at(code, offset)))
    }

    fn find_class(&self, code: &str, name: &str) -> Result<Option<Declaration>> {
        let pattern = format!(r"\bclass\s+(?P<name>{})(?:[^\w$]|$)", regex::escape(name));
        let regex = Regex::new(&pattern)?;
        Ok(regex
            .captures(code)
            .and_then(|caps| caps.name("name"))
            .map(|m| declaration_at(code, keyword_start(code, m.start()))))
    }
}

impl DeclarationLocator for JavaScriptLocator {
    fn find(&self, code: &str, name: &str, kind: EntityKind) -> Result<Option<Declaration>> {
        match kind {
            EntityKind::Class => self.find_class(code, name),
            EntityKind::Method => match self.find_function(code, name, FunctionPass::Conventional)? {
                Some(declaration) => Ok(Some(declaration)),
                None => self.find_function(code, name, FunctionPass::Arrow),
            },
        }
    }
}

/// Start of the `class` keyword in front of the name at `offset`
fn keyword_start(code: &str, offset: usize) -> usize {
    code[..offset].trim_end().rfind("class").unwrap_or(offset)
}

/// Shorthand matches inside control flow (`if (x) {`) are not declarations
fn is_control_keyword(code: &str, offset: usize) -> bool {
    const CONTROL: &[&str] = &["if", "for", "while", "switch", "catch", "with", "return"];
    let name_end = code[offset..]
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .map_or(code.len(), |i| offset + i);
    CONTROL.contains(&&code[offset..name_end])
}

fn declaration_at(code: &str, offset: usize) -> Declaration {
    let start = MODIFIERS.extend_back(code, offset);
    let documented = is_documented(code, start);
    Declaration {
        span: start..line_end(code, offset),
        insertion: insertion_above_line(code, start, documented),
    }
}

fn is_documented(code: &str, offset: usize) -> bool {
    let start = line_start(code, offset);
    if start == 0 {
        return false;
    }
    code[..start - 1]
        .rsplit('\n')
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.ends_with("*/") || line.starts_with("//"))
}
