//! PHP aggregator
//!
//! `/** ... */` doc blocks go in front of functions, methods and class-like
//! declarations, ahead of any modifiers and attributes.

use super::{insert_located, Aggregator};
use crate::format::CommentFormatter;
use crate::header::FileHeaderInserter;
use crate::locate::{DeclarationLocator, PhpLocator};
use crate::types::{DocumentationEntity, EntityKind, Language};
use crate::Result;

pub struct PhpAggregator {
    header: FileHeaderInserter,
    formatter: CommentFormatter,
    locator: PhpLocator,
}

impl PhpAggregator {
    pub fn new() -> Self {
        Self::with_max_width(docfuse_utils::DEFAULT_WRAP_WIDTH)
    }

    pub fn with_max_width(max_width: usize) -> Self {
        let formatter = CommentFormatter::for_language(Language::Php).with_max_width(max_width);
        Self {
            header: FileHeaderInserter::new(Language::Php, formatter.clone()),
            formatter,
            locator: PhpLocator::new(),
        }
    }
}

impl Default for PhpAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for PhpAggregator {
    fn language(&self) -> Language {
        Language::Php
    }

    fn header(&self) -> &FileHeaderInserter {
        &self.header
    }

    fn document_entities(
        &self,
        code: &str,
        floor: usize,
        kind: EntityKind,
        entities: &[&DocumentationEntity],
    ) -> Result<String> {
        let result = insert_located(code, floor, entities, &self.formatter, |region, entity| {
            self.locator.find(region, &entity.name, kind)
        })?;
        Ok(result.code)
    }
}
