//! Indentation probing
//!
//! Widths count a tab as four columns and a space as one. The literal
//! whitespace prefix is kept alongside the width so inserted comments reuse
//! tabs where the surrounding code uses tabs.

use docfuse_utils::leading_whitespace;

/// Columns a tab counts for
pub const TAB_WIDTH: usize = 4;

/// Indentation of one line: its width and the literal prefix
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Indentation {
    width: usize,
    prefix: String,
}

impl Indentation {
    /// Indentation made of `width` spaces
    pub fn spaces(width: usize) -> Self {
        Self {
            width,
            prefix: " ".repeat(width),
        }
    }

    /// Indentation taken from the leading whitespace of `line`
    pub fn of_line(line: &str) -> Self {
        let prefix = leading_whitespace(line);
        Self {
            width: prefix_width(prefix),
            prefix: prefix.to_string(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// One level deeper, in the same whitespace style
    pub fn deeper(&self) -> Self {
        if self.prefix.contains('\t') {
            Self {
                width: self.width + TAB_WIDTH,
                prefix: format!("{}\t", self.prefix),
            }
        } else {
            Self {
                width: self.width + TAB_WIDTH,
                prefix: format!("{}{}", self.prefix, " ".repeat(TAB_WIDTH)),
            }
        }
    }
}

fn prefix_width(prefix: &str) -> usize {
    prefix
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Byte offset of the start of the line containing `offset`
pub fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte offset of the end of the line containing `offset`, excluding the newline
pub fn line_end(text: &str, offset: usize) -> usize {
    text[offset..].find('\n').map_or(text.len(), |i| offset + i)
}

/// The full line containing `offset`
pub fn line_at(text: &str, offset: usize) -> &str {
    &text[line_start(text, offset)..line_end(text, offset)]
}

/// Indentation of the line containing `offset`
pub fn indentation_at(text: &str, offset: usize) -> Indentation {
    Indentation::of_line(line_at(text, offset))
}

/// Indentation width of the first line containing `anchor`, or 0 when the
/// anchor does not occur.
pub fn indentation_of(text: &str, anchor: &str) -> usize {
    text.find(anchor)
        .map_or(0, |offset| indentation_at(text, offset).width())
}

/// Indentation width of the first non-blank line after the line containing
/// `anchor`. Returns 0 when the anchor is absent or nothing follows it.
pub fn body_indentation_of(text: &str, anchor: &str) -> usize {
    let Some(offset) = text.find(anchor) else {
        return 0;
    };
    let after = line_end(text, offset);
    text[after..]
        .lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .map_or(0, |line| Indentation::of_line(line).width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_of_counts_tabs_as_four() {
        let text = "func main() {\n\tx := 1\n  \ty := 2\n}\n";
        assert_eq!(indentation_of(text, "func main"), 0);
        assert_eq!(indentation_of(text, "x := 1"), 4);
        assert_eq!(indentation_of(text, "y := 2"), 6);
    }

    #[test]
    fn test_missing_anchor_is_zero() {
        assert_eq!(indentation_of("def f():\n    pass\n", "class"), 0);
        assert_eq!(body_indentation_of("def f():\n    pass\n", "class"), 0);
    }

    #[test]
    fn test_body_indentation_skips_blank_lines() {
        let text = "class A:\n\n\n        def b(self):\n            pass\n";
        assert_eq!(body_indentation_of(text, "class A"), 8);
        assert_eq!(body_indentation_of(text, "def b"), 12);
        assert_eq!(body_indentation_of("def last():", "def last"), 0);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "    target\ntarget\n";
        assert_eq!(indentation_of(text, "target"), 4);
    }

    #[test]
    fn test_deeper_keeps_whitespace_style() {
        let tabs = Indentation::of_line("\tfunc() {");
        assert_eq!(tabs.deeper().as_str(), "\t\t");
        assert_eq!(tabs.deeper().width(), 8);

        let spaces = Indentation::of_line("  def f(): pass");
        assert_eq!(spaces.deeper().as_str(), "      ");
        assert_eq!(Indentation::spaces(0).deeper(), Indentation::spaces(4));
    }

    #[test]
    fn test_line_helpers() {
        let text = "one\n  two\nthree";
        let two = text.find("two").unwrap();
        assert_eq!(line_start(text, two), 4);
        assert_eq!(line_at(text, two), "  two");
        assert_eq!(line_at(text, text.len()), "three");
    }
}
