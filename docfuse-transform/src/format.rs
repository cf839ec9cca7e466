//! Comment formatting per language
//!
//! Turns a docstring into indented comment lines in the syntax of the target
//! language, word-wrapped so no line runs past the configured width. Words
//! longer than the width stay whole.

use docfuse_utils::{wrap_words, DEFAULT_WRAP_WIDTH};

use crate::indent::Indentation;
use crate::types::Language;

/// Narrowest text column kept after indentation and comment markers
const MIN_TEXT_WIDTH: usize = 20;

/// Comment syntax used for inserted documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `"""text"""` string literal as the first body statement
    PythonDocstring,
    /// `/** ... */` with ` * ` line prefixes
    DocBlock,
    /// `/* ... */` with the text lines as-is
    Block,
    /// `// ` on every line
    Line,
}

impl CommentStyle {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Python => CommentStyle::PythonDocstring,
            Language::Php => CommentStyle::DocBlock,
            Language::Go => CommentStyle::Line,
            Language::JavaScript => CommentStyle::Block,
        }
    }

    /// Columns the style adds around a text line
    fn marker_width(self) -> usize {
        match self {
            CommentStyle::Block => 0,
            CommentStyle::DocBlock | CommentStyle::Line => 3,
            // a one-line docstring carries both quote triples
            CommentStyle::PythonDocstring => 6,
        }
    }

    fn inline_marker(self) -> &'static str {
        match self {
            CommentStyle::PythonDocstring => "#",
            _ => "//",
        }
    }
}

/// Formats docstrings into comment blocks for one language
#[derive(Debug, Clone)]
pub struct CommentFormatter {
    style: CommentStyle,
    max_width: usize,
}

impl CommentFormatter {
    pub fn new(style: CommentStyle) -> Self {
        Self {
            style,
            max_width: DEFAULT_WRAP_WIDTH,
        }
    }

    pub fn for_language(language: Language) -> Self {
        Self::new(CommentStyle::for_language(language))
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn style(&self) -> CommentStyle {
        self.style
    }

    fn wrap(&self, docstring: &str, indentation: &Indentation) -> Vec<String> {
        let width = self
            .max_width
            .saturating_sub(indentation.width() + self.style.marker_width())
            .max(MIN_TEXT_WIDTH);
        wrap_words(docstring, width)
    }

    /// Format `docstring` as a block comment with every line indented.
    ///
    /// The result has no trailing newline. Returns `None` when the docstring
    /// has no words, so callers insert nothing.
    pub fn format_block(&self, docstring: &str, indentation: &Indentation) -> Option<String> {
        let lines = self.wrap(docstring, indentation);
        if lines.iter().all(|line| line.trim().is_empty()) {
            return None;
        }
        let ind = indentation.as_str();

        let out: Vec<String> = match self.style {
            CommentStyle::PythonDocstring => python_docstring(&lines, ind),
            CommentStyle::DocBlock => {
                let mut out = vec![format!("{}/**", ind)];
                out.extend(lines.iter().map(|line| {
                    if line.is_empty() {
                        format!("{} *", ind)
                    } else {
                        format!("{} * {}", ind, close_safe(line))
                    }
                }));
                out.push(format!("{} */", ind));
                out
            }
            CommentStyle::Block => {
                let mut out = vec![format!("{}/*", ind)];
                out.extend(lines.iter().map(|line| {
                    if line.is_empty() {
                        String::new()
                    } else {
                        format!("{}{}", ind, close_safe(line))
                    }
                }));
                out.push(format!("{}*/", ind));
                out
            }
            CommentStyle::Line => lines
                .iter()
                .map(|line| {
                    if line.is_empty() {
                        format!("{}//", ind)
                    } else {
                        format!("{}// {}", ind, line)
                    }
                })
                .collect(),
        };
        Some(out.join("\n"))
    }

    /// Format `docstring` as unindented single-line comments
    pub fn format_inline(&self, docstring: &str) -> Vec<String> {
        let marker = self.style.inline_marker();
        self.wrap(docstring, &Indentation::default())
            .iter()
            .map(|line| {
                if line.is_empty() {
                    marker.to_string()
                } else {
                    format!("{} {}", marker, line)
                }
            })
            .collect()
    }
}

/// `*/` inside a block comment would end it early
fn close_safe(line: &str) -> String {
    line.replace("*/", "*\\/")
}

fn python_escape(line: &str) -> String {
    line.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

/// `"` at the end of `line` that no backslash escapes
fn ends_with_bare_quote(line: &str) -> bool {
    let Some(body) = line.strip_suffix('"') else {
        return false;
    };
    let backslashes = body.len() - body.trim_end_matches('\\').len();
    backslashes % 2 == 0
}

fn python_docstring(lines: &[String], ind: &str) -> Vec<String> {
    let mut escaped: Vec<String> = lines.iter().map(|line| python_escape(line)).collect();
    // A closing quote right before the terminator would end the literal early
    if let Some(last) = escaped.last_mut() {
        if ends_with_bare_quote(last) {
            last.pop();
            last.push_str("\\\"");
        }
    }

    let count = escaped.len();
    escaped
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let open = if i == 0 { "\"\"\"" } else { "" };
            let close = if i + 1 == count { "\"\"\"" } else { "" };
            if line.is_empty() && i != 0 && i + 1 != count {
                String::new()
            } else {
                format!("{}{}{}{}", ind, open, line, close)
            }
        })
        .collect()
}
