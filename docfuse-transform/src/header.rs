//! File header insertion
//!
//! The file docstring goes at the very top of the file, after any preamble
//! that must stay first (`<?php`, a `#!` shebang line). A file whose first
//! token after the preamble already opens a comment is treated as having a
//! header and left alone.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::format::CommentFormatter;
use crate::indent::{line_end, Indentation};
use crate::types::Language;

lazy_static! {
    static ref PHP_OPEN_TAG: Regex =
        Regex::new(r"^<\?(?:php\b|=)?").expect("PHP open tag pattern is valid");
}

/// Inserts the file-level docstring for one language
#[derive(Debug, Clone)]
pub struct FileHeaderInserter {
    language: Language,
    formatter: CommentFormatter,
}

/// Result of a header insertion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOutcome {
    pub code: String,
    /// Byte offset just past the inserted header and its separator, or
    /// `None` when nothing was inserted.
    pub inserted_end: Option<usize>,
}

impl FileHeaderInserter {
    pub fn new(language: Language, formatter: CommentFormatter) -> Self {
        Self { language, formatter }
    }

    pub fn for_language(language: Language) -> Self {
        Self::new(language, CommentFormatter::for_language(language))
    }

    /// Insert `file_docstring` at the top of `code` unless a header exists.
    pub fn insert_file_header(&self, code: &str, file_docstring: Option<&str>) -> HeaderOutcome {
        let unchanged = || HeaderOutcome {
            code: code.to_string(),
            inserted_end: None,
        };

        let Some(docstring) = file_docstring.filter(|d| !d.trim().is_empty()) else {
            return unchanged();
        };

        let preamble_end = self.preamble_end(code);
        let rest = &code[preamble_end..];
        if self.has_header(rest) {
            debug!("{} file already has a header, skipping", self.language);
            return unchanged();
        }

        let Some(block) = self.formatter.format_block(docstring, &Indentation::default()) else {
            return unchanged();
        };

        let mut inserted = block;
        inserted.push('\n');
        // One blank line between the header and the code that follows
        if !rest.trim().is_empty() && !rest.starts_with('\n') && !rest.starts_with("\r\n") {
            inserted.push('\n');
        }

        let mut out = String::with_capacity(code.len() + inserted.len() + 1);
        out.push_str(&code[..preamble_end]);
        if preamble_end > 0 && !code[..preamble_end].ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&inserted);
        let inserted_end = out.len();
        out.push_str(rest);

        HeaderOutcome {
            code: out,
            inserted_end: Some(inserted_end),
        }
    }

    /// Byte offset where the header may start
    fn preamble_end(&self, code: &str) -> usize {
        let preamble = match self.language {
            Language::Php => PHP_OPEN_TAG.is_match(code),
            Language::JavaScript => code.starts_with("#!"),
            Language::Python | Language::Go => false,
        };
        if !preamble {
            return 0;
        }
        let end = line_end(code, 0);
        if end < code.len() {
            end + 1
        } else {
            end
        }
    }

    fn has_header(&self, rest: &str) -> bool {
        let token = rest.trim_start();
        if token.is_empty() {
            return false;
        }
        match self.language {
            Language::Python => {
                let unprefixed = token.trim_start_matches(|c: char| "rRuUbB".contains(c));
                token.starts_with('#')
                    || unprefixed.starts_with("\"\"\"")
                    || unprefixed.starts_with("'''")
            }
            // `#[` opens an attribute, not a comment
            Language::Php => {
                token.starts_with("/*")
                    || token.starts_with("//")
                    || (token.starts_with('#') && !token.starts_with("#["))
            }
            Language::Go | Language::JavaScript => {
                token.starts_with("//") || token.starts_with("/*")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(language: Language, code: &str, doc: &str) -> String {
        FileHeaderInserter::for_language(language)
            .insert_file_header(code, Some(doc))
            .code
    }

    #[test]
    fn test_php_header_goes_after_open_tag() {
        let out = insert(Language::Php, "<?php\nclass A {}\n", "App entry.");
        assert_eq!(out, "<?php\n/**\n * App entry.\n */\n\nclass A {}\n");
    }

    #[test]
    fn test_php_existing_doc_block_is_kept() {
        let code = "<?php\n/** Existing. */\nclass A {}\n";
        assert_eq!(insert(Language::Php, code, "New."), code);
    }

    #[test]
    fn test_php_attribute_is_not_a_header() {
        let out = insert(Language::Php, "<?php\n#[Attr]\nclass A {}\n", "Doc.");
        assert!(out.starts_with("<?php\n/**\n * Doc.\n */\n\n#[Attr]"));
    }

    #[test]
    fn test_python_header() {
        let out = insert(Language::Python, "import os\n", "Helpers.");
        assert_eq!(out, "\"\"\"Helpers.\"\"\"\n\nimport os\n");
    }

    #[test]
    fn test_python_existing_comment_or_docstring_is_kept() {
        for code in ["# comment\nx = 1\n", "\"\"\"Doc.\"\"\"\n", "\n\nr'''raw'''\n"] {
            assert_eq!(insert(Language::Python, code, "New."), code);
        }
    }

    #[test]
    fn test_go_header_keeps_single_blank_line() {
        let out = insert(Language::Go, "\npackage main\n", "Entry point.");
        assert_eq!(out, "// Entry point.\n\npackage main\n");
    }

    #[test]
    fn test_javascript_shebang_stays_first() {
        let out = insert(Language::JavaScript, "#!/usr/bin/env node\nmain();\n", "CLI.");
        assert_eq!(out, "#!/usr/bin/env node\n/*\nCLI.\n*/\n\nmain();\n");
    }

    #[test]
    fn test_empty_code_gets_header_only() {
        assert_eq!(insert(Language::Go, "", "Doc."), "// Doc.\n");
    }

    #[test]
    fn test_missing_or_blank_docstring_is_noop() {
        let inserter = FileHeaderInserter::for_language(Language::Go);
        let outcome = inserter.insert_file_header("package main\n", None);
        assert_eq!(outcome.code, "package main\n");
        assert!(outcome.inserted_end.is_none());
        let outcome = inserter.insert_file_header("package main\n", Some("  "));
        assert!(outcome.inserted_end.is_none());
    }

    #[test]
    fn test_inserted_end_marks_header_extent() {
        let outcome = FileHeaderInserter::for_language(Language::Go)
            .insert_file_header("package main\n", Some("Doc."));
        let end = outcome.inserted_end.unwrap();
        assert_eq!(&outcome.code[end..], "package main\n");
    }

    #[test]
    fn test_header_insertion_is_idempotent() {
        let once = insert(Language::JavaScript, "export const x = 1;\n", "Constants.");
        assert_eq!(insert(Language::JavaScript, &once, "Constants."), once);
    }
}
