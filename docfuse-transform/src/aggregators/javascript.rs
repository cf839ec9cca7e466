//! JavaScript and TypeScript aggregator
//!
//! `/* ... */` blocks go on the lines above declarations. Functions are
//! documented in two passes: conventional declarations and method shorthand
//! first, then arrow-function bindings for the names the first pass did not
//! find.

use tracing::debug;

use super::{insert_located, Aggregator};
use crate::format::CommentFormatter;
use crate::header::FileHeaderInserter;
use crate::locate::javascript::FunctionPass;
use crate::locate::{DeclarationLocator, JavaScriptLocator};
use crate::types::{DocumentationEntity, EntityKind, Language};
use crate::Result;

pub struct JavaScriptAggregator {
    header: FileHeaderInserter,
    formatter: CommentFormatter,
    locator: JavaScriptLocator,
}

impl JavaScriptAggregator {
    pub fn new() -> Self {
        Self::with_max_width(docfuse_utils::DEFAULT_WRAP_WIDTH)
    }

    pub fn with_max_width(max_width: usize) -> Self {
        let formatter =
            CommentFormatter::for_language(Language::JavaScript).with_max_width(max_width);
        Self {
            header: FileHeaderInserter::new(Language::JavaScript, formatter.clone()),
            formatter,
            locator: JavaScriptLocator::new(),
        }
    }
}

impl Default for JavaScriptAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for JavaScriptAggregator {
    fn language(&self) -> Language {
        Language::JavaScript
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
        if kind == EntityKind::Class {
            let result = insert_located(code, floor, entities, &self.formatter, |region, entity| {
                self.locator.find(region, &entity.name, EntityKind::Class)
            })?;
            return Ok(result.code);
        }

        let conventional = insert_located(code, floor, entities, &self.formatter, |region, entity| {
            self.locator
                .find_function(region, &entity.name, FunctionPass::Conventional)
        })?;
        if conventional.unmatched.is_empty() {
            return Ok(conventional.code);
        }

        debug!(count = conventional.unmatched.len(), "looking for arrow functions");
        let arrow = insert_located(
            &conventional.code,
            floor,
            &conventional.unmatched,
            &self.formatter,
            |region, entity| {
                self.locator
                    .find_function(region, &entity.name, FunctionPass::Arrow)
            },
        )?;
        Ok(arrow.code)
    }
}
