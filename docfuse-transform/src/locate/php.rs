//! PHP declaration locator
//!
//! Matches `function name(` and `class|interface|trait|enum Name`, then
//! walks back over visibility and other modifiers plus `#[...]` attribute
//! lines so the comment lands in front of the whole declaration. A
//! declaration is documented when the text before it ends a `*/` block.

use regex::Regex;

use super::{insertion_before, Declaration, DeclarationLocator, ModifierGrammar};
use crate::indent::line_end;
use crate::types::EntityKind;
use crate::Result;

const MODIFIERS: ModifierGrammar = ModifierGrammar {
    keywords: &[
        "public",
        "protected",
        "private",
        "static",
        "abstract",
        "final",
        "readonly",
    ],
    attribute_prefixes: &["#["],
};

/// Signature-pattern locator for PHP
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpLocator;

impl PhpLocator {
    pub fn new() -> Self {
        Self
    }

    fn pattern(name: &str, kind: EntityKind) -> Result<Regex> {
        let name = regex::escape(name);
        let pattern = match kind {
            EntityKind::Method => format!(r"\b(?i:function)\s+&?\s*{}\s*\(", name),
            EntityKind::Class => {
                format!(r"\b(?i:class|interface|trait|enum)\s+{}(?:[^\w]|$)", name)
            }
        };
        Ok(Regex::new(&pattern)?)
    }
}

impl DeclarationLocator for PhpLocator {
    fn find(&self, code: &str, name: &str, kind: EntityKind) -> Result<Option<Declaration>> {
        let pattern = Self::pattern(name, kind)?;
        // `Foo::class` is a constant, not a declaration
        let Some(found) = pattern
            .find_iter(code)
            .find(|m| !code[..m.start()].ends_with("::"))
        else {
            return Ok(None);
        };

        let start = MODIFIERS.extend_back(code, found.start());
        let documented = code[..start].trim_end().ends_with("*/");

        Ok(Some(Declaration {
            span: start..line_end(code, found.start()),
            insertion: insertion_before(code, start, documented),
        }))
    }
}
