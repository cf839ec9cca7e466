//! Declaration locators
//!
//! A locator finds the first declaration of a named class or function in a
//! piece of source text and reports where a comment block for it would go,
//! and whether one is already there. Python is located structurally with
//! tree-sitter; the other languages use signature patterns plus a small
//! modifier grammar that walks back over keywords and attribute lines.

pub mod go;
pub mod javascript;
pub mod php;
pub mod python;

pub use go::GoLocator;
pub use javascript::JavaScriptLocator;
pub use php::PhpLocator;
pub use python::PythonLocator;

use std::ops::Range;

use crate::indent::{indentation_at, line_start, Indentation};
use crate::types::{EntityKind, InsertionPoint, Language, Placement};
use crate::Result;

/// A located declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Byte range of the declaration head, modifiers included
    pub span: Range<usize>,
    pub insertion: InsertionPoint,
}

impl Declaration {
    pub fn already_documented(&self) -> bool {
        self.insertion.already_documented
    }
}

/// Finds declarations by name and kind
pub trait DeclarationLocator: Send + Sync {
    /// Locate the first declaration of `name`. `Ok(None)` means no
    /// declaration matched.
    fn find(&self, code: &str, name: &str, kind: EntityKind) -> Result<Option<Declaration>>;
}

/// Locator for a language
pub fn locator_for(language: Language) -> Box<dyn DeclarationLocator> {
    match language {
        Language::Python => Box::new(PythonLocator::new()),
        Language::Php => Box::new(PhpLocator::new()),
        Language::Go => Box::new(GoLocator::new()),
        Language::JavaScript => Box::new(JavaScriptLocator::new()),
    }
}

/// Keywords and attribute lines that may precede a declaration
#[derive(Debug, Clone, Copy)]
pub struct ModifierGrammar {
    pub keywords: &'static [&'static str],
    /// Whole preceding lines starting with one of these belong to the
    /// declaration (`#[` attributes, `@` decorators)
    pub attribute_prefixes: &'static [&'static str],
}

impl ModifierGrammar {
    /// Walk back from `offset` over modifier keywords and attribute lines.
    /// Returns the offset of the earliest one found.
    pub fn extend_back(&self, code: &str, offset: usize) -> usize {
        let mut pos = offset;
        loop {
            let head = code[..pos].trim_end();
            let word = trailing_word(head);
            if !word.is_empty() && self.keywords.contains(&word) {
                pos = head.len() - word.len();
                continue;
            }

            let start = line_start(code, pos);
            if start > 0 && code[start..pos].trim().is_empty() {
                let prev_start = line_start(code, start - 1);
                let prev = code[prev_start..start - 1].trim_start();
                if self
                    .attribute_prefixes
                    .iter()
                    .any(|prefix| prev.starts_with(prefix))
                {
                    pos = start - 1 - prev.len();
                    continue;
                }
            }
            break;
        }
        pos
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Identifier characters at the end of `text`
pub(crate) fn trailing_word(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map_or(text.len(), |(i, _)| i);
    &text[start..]
}

/// Up to `limit` lines above the line containing `offset`, nearest first
pub(crate) fn preceding_lines(code: &str, offset: usize, limit: usize) -> Vec<&str> {
    let start = line_start(code, offset);
    if start == 0 {
        return Vec::new();
    }
    code[..start - 1].rsplit('\n').take(limit).collect()
}

/// Insertion point in front of the declaration head starting at `offset`.
/// Whole lines are inserted when only whitespace precedes it on its line.
pub(crate) fn insertion_before(code: &str, offset: usize, already_documented: bool) -> InsertionPoint {
    let start = line_start(code, offset);
    let indentation = indentation_at(code, offset);
    if code[start..offset].trim().is_empty() {
        InsertionPoint {
            offset: start,
            indentation,
            placement: Placement::LineStart,
            already_documented,
        }
    } else {
        InsertionPoint {
            offset,
            indentation,
            placement: Placement::MidLine,
            already_documented,
        }
    }
}

/// Insertion point at the start of the line containing `offset`
pub(crate) fn insertion_above_line(code: &str, offset: usize, already_documented: bool) -> InsertionPoint {
    InsertionPoint {
        offset: line_start(code, offset),
        indentation: Indentation::of_line(crate::indent::line_at(code, offset)),
        placement: Placement::LineStart,
        already_documented,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHP_LIKE: ModifierGrammar = ModifierGrammar {
        keywords: &["public", "static"],
        attribute_prefixes: &["#["],
    };

    #[test]
    fn test_extend_back_over_keywords() {
        let code = "class A {\n    public static function run() {}\n}";
        let function = code.find("function").unwrap();
        let start = PHP_LIKE.extend_back(code, function);
        assert_eq!(&code[start..function], "public static ");
    }

    #[test]
    fn test_extend_back_over_attribute_lines() {
        let code = "x\n  #[Route('/a')]\n  #[Cached]\n  public function run() {}";
        let function = code.find("function").unwrap();
        let start = PHP_LIKE.extend_back(code, function);
        assert!(code[start..].starts_with("#[Route"));
    }

    #[test]
    fn test_extend_back_stops_at_other_words() {
        let code = "return function run() {}";
        let function = code.find("function").unwrap();
        assert_eq!(PHP_LIKE.extend_back(code, function), function);
        assert_eq!(PHP_LIKE.extend_back("function f", 0), 0);
    }

    #[test]
    fn test_preceding_lines_nearest_first() {
        let code = "a\nb\nc\ntarget";
        let offset = code.find("target").unwrap();
        assert_eq!(preceding_lines(code, offset, 2), vec!["c", "b"]);
        assert!(preceding_lines(code, 0, 3).is_empty());
    }

    #[test]
    fn test_insertion_before_mid_line() {
        let code = "x = 1; function f() {}";
        let offset = code.find("function").unwrap();
        let point = insertion_before(code, offset, false);
        assert_eq!(point.placement, Placement::MidLine);
        assert_eq!(point.offset, offset);

        let code = "    function f() {}";
        let point = insertion_before(code, 4, true);
        assert_eq!(point.placement, Placement::LineStart);
        assert_eq!(point.offset, 0);
        assert_eq!(point.indentation.width(), 4);
        assert!(point.already_documented);
    }
}
