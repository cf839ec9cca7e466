//! Per-language documentation aggregators
//!
//! An aggregator takes the original source text and its [`Documentation`]
//! and produces the documented text. Work happens in fixed stages:
//!
//! 1. the file header is inserted
//! 2. functions and methods are documented
//! 3. classes are documented
//!
//! Every stage scans the text produced by the previous one, so offsets never
//! go stale across stages. Within a stage all declarations are located
//! against the same text and insertions are applied from the end of the file
//! backwards, which keeps the result independent of the order of entries in
//! the documentation.
//!
//! Entities whose declaration cannot be found, or which already carry a
//! comment, are skipped. Original text is never rewritten; the only bytes
//! dropped are trailing blanks on a line that is split for a comment.

pub mod go;
pub mod javascript;
pub mod php;
pub mod python;

pub use go::GoAggregator;
pub use javascript::JavaScriptAggregator;
pub use php::PhpAggregator;
pub use python::PythonAggregator;

use std::fmt;

use tracing::{debug, trace};

use crate::format::CommentFormatter;
use crate::header::FileHeaderInserter;
use crate::locate::Declaration;
use crate::types::{Documentation, DocumentationEntity, EntityKind, Language, Placement};
use crate::Result;

/// Progress of one aggregation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    FileHeaderInserted,
    MethodsDocumented,
    ClassesDocumented,
    Done,
}

impl Stage {
    /// The stage that follows this one
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::FileHeaderInserted),
            Stage::FileHeaderInserted => Some(Stage::MethodsDocumented),
            Stage::MethodsDocumented => Some(Stage::ClassesDocumented),
            Stage::ClassesDocumented => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::FileHeaderInserted => "file_header_inserted",
            Stage::MethodsDocumented => "methods_documented",
            Stage::ClassesDocumented => "classes_documented",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inserts documentation into source text of one language
pub trait Aggregator: Send + Sync {
    /// Language handled by this aggregator
    fn language(&self) -> Language;

    /// File header inserter for the language
    fn header(&self) -> &FileHeaderInserter;

    /// Reject source that cannot be documented safely
    fn validate(&self, _code: &str) -> Result<()> {
        Ok(())
    }

    /// Document every entity of `kind` in `code`. Text before `floor` was
    /// inserted by this run and must not be matched against.
    fn document_entities(
        &self,
        code: &str,
        floor: usize,
        kind: EntityKind,
        entities: &[&DocumentationEntity],
    ) -> Result<String>;

    /// Run all stages and return the documented source
    fn document(&self, documentation: &Documentation, code: &str) -> Result<String> {
        self.validate(code)?;

        let mut stage = Stage::Start;
        let mut text = code.to_string();
        let mut floor = 0;

        while let Some(next) = stage.next() {
            text = match next {
                Stage::FileHeaderInserted => {
                    let outcome = self
                        .header()
                        .insert_file_header(&text, documentation.file_text());
                    floor = outcome.inserted_end.unwrap_or(0);
                    outcome.code
                }
                Stage::MethodsDocumented => {
                    let methods = documentation.insertable(EntityKind::Method);
                    self.document_entities(&text, floor, EntityKind::Method, &methods)?
                }
                Stage::ClassesDocumented => {
                    let classes = documentation.insertable(EntityKind::Class);
                    self.document_entities(&text, floor, EntityKind::Class, &classes)?
                }
                Stage::Start | Stage::Done => text,
            };
            trace!(language = self.language().as_str(), stage = %next, "stage complete");
            stage = next;
        }

        Ok(text)
    }
}

/// Aggregator for `language` with the default line width
pub fn aggregator_for(language: Language) -> Box<dyn Aggregator> {
    aggregator_with_width(language, docfuse_utils::DEFAULT_WRAP_WIDTH)
}

/// Aggregator for `language` wrapping comments at `max_width` columns
pub fn aggregator_with_width(language: Language, max_width: usize) -> Box<dyn Aggregator> {
    match language {
        Language::Python => Box::new(PythonAggregator::with_max_width(max_width)),
        Language::Php => Box::new(PhpAggregator::with_max_width(max_width)),
        Language::Go => Box::new(GoAggregator::with_max_width(max_width)),
        Language::JavaScript => Box::new(JavaScriptAggregator::with_max_width(max_width)),
    }
}

/// A comment block ready to be spliced in
#[derive(Debug)]
struct PlannedInsertion<'a> {
    offset: usize,
    /// Bytes of blank space before `offset` that the text replaces
    gap: usize,
    name: &'a str,
    text: String,
}

/// Result of documenting one batch of entities
#[derive(Debug)]
pub(crate) struct StageResult<'a> {
    pub code: String,
    /// Entities whose declaration was not found
    pub unmatched: Vec<&'a DocumentationEntity>,
}

/// Locate each entity in `code[floor..]` and splice in the comment blocks
/// for those not yet documented.
pub(crate) fn insert_located<'a, F>(
    code: &str,
    floor: usize,
    entities: &[&'a DocumentationEntity],
    formatter: &CommentFormatter,
    mut locate: F,
) -> Result<StageResult<'a>>
where
    F: FnMut(&str, &DocumentationEntity) -> Result<Option<Declaration>>,
{
    let region = &code[floor..];
    let mut planned = Vec::new();
    let mut unmatched = Vec::new();

    for &entity in entities {
        let Some(declaration) = locate(region, entity)? else {
            debug!(name = %entity.name, kind = %entity.kind, "declaration not found, skipping");
            unmatched.push(entity);
            continue;
        };
        if declaration.already_documented() {
            debug!(name = %entity.name, kind = %entity.kind, "already documented, skipping");
            continue;
        }

        let point = declaration.insertion;
        if let Some(block) = formatter.format_block(&entity.docstring, &point.indentation) {
            // A split line must not keep trailing blanks before the break
            let gap = match point.placement {
                Placement::MidLine => trailing_blank_len(&region[..point.offset]),
                Placement::LineStart => 0,
            };
            planned.push(PlannedInsertion {
                offset: floor + point.offset,
                gap,
                name: &entity.name,
                text: point.render(&block),
            });
        }
    }

    Ok(StageResult {
        code: apply_insertions(code, planned),
        unmatched,
    })
}

/// Apply insertions from the end of the text backwards so earlier offsets
/// stay valid.
fn apply_insertions(code: &str, mut planned: Vec<PlannedInsertion<'_>>) -> String {
    planned.sort_by(|a, b| a.offset.cmp(&b.offset).then_with(|| a.name.cmp(b.name)));
    planned.dedup_by(|a, b| a.offset == b.offset && a.name == b.name);

    let extra: usize = planned.iter().map(|p| p.text.len()).sum();
    let mut out = String::with_capacity(code.len() + extra);
    out.push_str(code);
    // (offset, gap) of the last applied insertion
    let mut previous: Option<(usize, usize)> = None;
    for insertion in planned.iter().rev() {
        debug!(name = insertion.name, offset = insertion.offset, "inserting comment block");
        let range = match previous {
            Some((offset, gap)) if offset == insertion.offset => offset - gap..offset - gap,
            _ => insertion.offset - insertion.gap..insertion.offset,
        };
        out.replace_range(range, &insertion.text);
        previous = Some((insertion.offset, insertion.gap));
    }
    out
}

fn trailing_blank_len(text: &str) -> usize {
    text.len() - text.trim_end_matches([' ', '\t']).len()
}
