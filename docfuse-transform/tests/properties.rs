//! Properties of the aggregators: idempotence, non-destruction, order
//! independence and the line width bound.

use docfuse_transform::{aggregator_for, Documentation, DocumentationEntity, Language};
use proptest::prelude::*;
use std::collections::HashSet;

const GO_SOURCE: &str = "\
package shapes

type Circle struct {
\tradius float64
}

func (c Circle) Area() float64 {
\treturn 3.14 * c.radius * c.radius
}
func Perimeter(c Circle) float64 { return 2 * 3.14 * c.radius }

// Scale is already documented.
func Scale(c Circle, f float64) Circle {
\treturn Circle{c.radius * f}
}
";

const PYTHON_SOURCE: &str = "\
class Stack:
    def push(self, item):
        self.items.append(item)

    def pop(self):
        return self.items.pop()

def peek(stack): return stack.items[-1]
";

const JS_SOURCE: &str = "\
export function parse(text) {
  return JSON.parse(text);
}
const format = (value) => JSON.stringify(value);
class Codec {
  encode(value) {
    return format(value);
  }
}
";

const PHP_SOURCE: &str = "\
<?php

namespace App;

#[Entity]
final class Ledger
{
    private array $rows = [];

    #[Pure]
    public static function open(string $name): self
    {
        return new self();
    }

    protected function append(array $row): void { $this->rows[] = $row; }

    /**
     * Total is already documented.
     */
    public function total(): int
    {
        return array_sum($this->rows);
    }
}
";

fn method_names(language: Language) -> &'static [&'static str] {
    match language {
        Language::Go => &["Area", "Perimeter", "Scale", "Missing"],
        Language::Python => &["push", "pop", "peek"],
        Language::JavaScript => &["parse", "format", "encode"],
        Language::Php => &["open", "append", "total", "absent"],
    }
}

fn source(language: Language) -> &'static str {
    match language {
        Language::Go => GO_SOURCE,
        Language::Python => PYTHON_SOURCE,
        Language::JavaScript => JS_SOURCE,
        Language::Php => PHP_SOURCE,
    }
}

fn documentation(language: Language, order: &[usize]) -> Documentation {
    let names = method_names(language);
    let mut doc = Documentation {
        file_docstring: Some("Generated summary.".into()),
        ..Documentation::default()
    };
    for &i in order {
        doc.push(DocumentationEntity::method(names[i], format!("Documents {}.", names[i])));
    }
    doc.push(DocumentationEntity::class(
        match language {
            Language::Go => "Circle",
            Language::Python => "Stack",
            Language::Php => "Ledger",
            Language::JavaScript => "Codec",
        },
        "A type.",
    ));
    doc
}

fn languages() -> [Language; 4] {
    [Language::Go, Language::Python, Language::JavaScript, Language::Php]
}

#[test]
fn documenting_twice_changes_nothing() {
    for language in languages() {
        let order: Vec<usize> = (0..method_names(language).len()).collect();
        let doc = documentation(language, &order);
        let aggregator = aggregator_for(language);
        let once = aggregator.document(&doc, source(language)).unwrap();
        let twice = aggregator.document(&doc, &once).unwrap();
        assert_eq!(once, twice, "{:?}", language);
        assert_ne!(once, source(language));
    }
}

#[test]
fn original_lines_survive_in_order() {
    for language in languages() {
        let order: Vec<usize> = (0..method_names(language).len()).collect();
        let doc = documentation(language, &order);
        let out = aggregator_for(language).document(&doc, source(language)).unwrap();

        // Every original line appears in the output, in the same order, except
        // a same-line Python body which is split after the colon.
        let mut output_lines = out.lines();
        for line in source(language).lines() {
            let expected = if line.starts_with("def peek") { "def peek(stack):" } else { line };
            assert!(
                output_lines.any(|candidate| candidate == expected),
                "{:?}: line {:?} lost",
                language,
                line
            );
        }
    }
}

#[test]
fn existing_comment_is_preserved_verbatim() {
    let doc = documentation(Language::Go, &[2]);
    let out = aggregator_for(Language::Go).document(&doc, GO_SOURCE).unwrap();
    assert!(out.contains("// Scale is already documented.\nfunc Scale("));
    assert!(!out.contains("Documents Scale."));

    let doc = documentation(Language::Php, &[0, 1, 2]);
    let out = aggregator_for(Language::Php).document(&doc, PHP_SOURCE).unwrap();
    assert!(out.contains("     * Total is already documented.\n     */\n    public function total(): int"));
    assert!(!out.contains("Documents total."));
    assert!(out.contains("/**\n * A type.\n */\n#[Entity]\nfinal class Ledger"));
    assert!(out.contains(
        "    /**\n     * Documents open.\n     */\n    #[Pure]\n    public static function open("
    ));
}

proptest! {
    #[test]
    fn method_order_does_not_matter(
        language_index in 0usize..4,
        order in Just(vec![0usize, 1, 2]).prop_shuffle(),
    ) {
        let language = languages()[language_index];
        let baseline = documentation(language, &[0, 1, 2]);
        let shuffled = documentation(language, &order);
        let aggregator = aggregator_for(language);
        prop_assert_eq!(
            aggregator.document(&baseline, source(language)).unwrap(),
            aggregator.document(&shuffled, source(language)).unwrap()
        );
    }

    #[test]
    fn inserted_lines_respect_width(
        language_index in 0usize..4,
        words in prop::collection::vec("[a-z]{1,12}", 1..80),
    ) {
        let language = languages()[language_index];
        let mut doc = Documentation::default();
        doc.push(DocumentationEntity::method(method_names(language)[1], words.join(" ")));
        let out = aggregator_for(language).document(&doc, source(language)).unwrap();

        let original: HashSet<&str> = source(language).lines().collect();
        let inserted: Vec<&str> = out.lines().filter(|line| !original.contains(line)).collect();
        prop_assert!(!inserted.is_empty());
        for line in inserted {
            prop_assert!(line.len() <= 90, "{:?} line too long: {}", language, line);
        }
        prop_assert!(out.contains(words[0].as_str()));
    }
}
