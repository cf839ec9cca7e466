//! Go aggregator
//!
//! `//` comments go on the lines directly above `func` and `type`
//! declarations, at the declaration's indentation.

use super::{insert_located, Aggregator};
use crate::format::CommentFormatter;
use crate::header::FileHeaderInserter;
use crate::locate::{DeclarationLocator, GoLocator};
use crate::types::{DocumentationEntity, EntityKind, Language};
use crate::Result;

pub struct GoAggregator {
    header: FileHeaderInserter,
    formatter: CommentFormatter,
    locator: GoLocator,
}

impl GoAggregator {
    pub fn new() -> Self {
        Self::with_max_width(docfuse_utils::DEFAULT_WRAP_WIDTH)
    }

    pub fn with_max_width(max_width: usize) -> Self {
        let formatter = CommentFormatter::for_language(Language::Go).with_max_width(max_width);
        Self {
            header: FileHeaderInserter::new(Language::Go, formatter.clone()),
            formatter,
            locator: GoLocator::new(),
        }
    }
}

impl Default for GoAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for GoAggregator {
    fn language(&self) -> Language {
        Language::Go
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
