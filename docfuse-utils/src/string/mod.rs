//! Text helpers for generated comments
//!
//! Line wrapping keeps inserted comments readable: a generated docstring
//! arrives as one long string and is re-flowed into lines of bounded width
//! before a language formatter wraps it in comment delimiters.

use unicode_segmentation::UnicodeSegmentation;

/// Default maximum width of a wrapped comment line
pub const DEFAULT_WRAP_WIDTH: usize = 90;

/// Width of a piece of text in user-perceived characters
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Re-flow `text` into lines no wider than `max_width`.
///
/// Words are packed greedily and a line is broken before the word that would
/// overflow it. Real newlines and literal `\n` sequences force a break; a run
/// of breaks collapses into a single empty line. A word wider than
/// `max_width` is emitted on its own line without being split.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    let normalized = text.replace("\\n", "\n");
    let mut lines: Vec<String> = Vec::new();

    for segment in normalized.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in segment.split_whitespace() {
            let word_width = display_width(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + 1 + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }

        if current.is_empty() {
            // paragraph break
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push(String::new());
            }
        } else {
            lines.push(current);
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines
}

/// Leading spaces and tabs of a line
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}
