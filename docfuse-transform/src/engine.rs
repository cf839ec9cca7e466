//! Documentation engine
//!
//! Drives the aggregators over files on disk: reads each source file and
//! its documentation JSON, skips files that should not be touched, writes
//! the documented output and records what happened. Batches run across
//! files in parallel; one failing file never stops the others.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use docfuse_utils::{create_backup, find_source_files, safe_path_join, write_with_parents, ConfigBuilder};

use crate::aggregators::aggregator_with_width;
use crate::types::{Documentation, Language};
use crate::{Result, TransformError};

/// Configuration for the documentation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum width of inserted comment lines
    pub max_line_width: usize,
    /// Leave files alone when their output already exists
    pub skip_existing_outputs: bool,
    /// Process batch files in parallel
    pub parallel: bool,
    /// Larger source files are skipped (bytes)
    pub max_file_size: u64,
    /// Directory names or `*suffix` patterns excluded from directory scans
    pub exclude_patterns: Vec<String>,
    /// Line prepended to every file docstring
    pub docstring_label: Option<String>,
    /// Back up originals before overwriting them in place
    pub backup_in_place: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut exclude_patterns: Vec<String> =
            docfuse_utils::default_exclusion_patterns().into_iter().collect();
        exclude_patterns.sort();
        Self {
            max_line_width: docfuse_utils::DEFAULT_WRAP_WIDTH,
            skip_existing_outputs: true,
            parallel: true,
            max_file_size: 10 * 1024 * 1024,
            exclude_patterns,
            docstring_label: None,
            backup_in_place: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with an optional TOML, JSON or YAML file, then
    /// with `adjust` (command-line overrides). The result is validated.
    pub fn load(path: Option<&Path>, adjust: impl FnOnce(&mut Self)) -> Result<Self> {
        let config = ConfigBuilder::<EngineConfig>::new()
            .load_optional_file(path)?
            .with(adjust)
            .build();
        config.validate()?;
        debug!("Engine configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_line_width == 0 {
            return Err(TransformError::Config(
                "max_line_width must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// One source file to document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileJob {
    pub source: PathBuf,
    /// Documentation JSON for the source file
    pub documentation: PathBuf,
    pub output: PathBuf,
    /// Overrides detection from the source extension
    pub language: Option<Language>,
}

impl FileJob {
    pub fn new(source: impl Into<PathBuf>, documentation: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            documentation: documentation.into(),
            output: output.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// The output overwrites the source
    pub fn in_place(&self) -> bool {
        self.output == self.source
    }

    fn resolve_language(&self) -> Option<Language> {
        self.language.or_else(|| Language::from_path(&self.source))
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Written {
        output: PathBuf,
        backup: Option<PathBuf>,
    },
    SkippedExisting,
    SkippedEmpty,
    SkippedTooLarge {
        size: u64,
    },
    Unsupported,
}

impl FileOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, FileOutcome::Written { .. })
    }
}

/// Result for one file in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcome: Option<FileOutcome>,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

/// Summary of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome.as_ref().is_some_and(FileOutcome::is_written))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome.as_ref().is_some_and(|o| !o.is_written()))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }

    /// Files that were read and processed rather than skipped
    pub fn attempted(&self) -> usize {
        self.written() + self.failed()
    }

    /// Every attempted file failed
    pub fn all_failed(&self) -> bool {
        self.attempted() > 0 && self.written() == 0
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Documents source files on disk
#[derive(Debug, Clone, Default)]
pub struct DocumentationEngine {
    config: EngineConfig,
}

impl DocumentationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Document source text in memory
    pub fn document_source(&self, language: Language, documentation: &Documentation, code: &str) -> Result<String> {
        let labelled;
        let documentation = match (&self.config.docstring_label, documentation.file_text()) {
            (Some(label), Some(text)) if !label.trim().is_empty() => {
                labelled = Documentation {
                    file_docstring: Some(format!("{}\n{}", label.trim(), text)),
                    ..documentation.clone()
                };
                &labelled
            }
            _ => documentation,
        };

        aggregator_with_width(language, self.config.max_line_width).document(documentation, code)
    }

    /// Document one file and write the result
    pub fn document_file(&self, job: &FileJob) -> Result<FileOutcome> {
        let Some(language) = job.resolve_language() else {
            debug!("No aggregator for {}", job.source.display());
            return Ok(FileOutcome::Unsupported);
        };

        if self.config.skip_existing_outputs && !job.in_place() && job.output.exists() {
            debug!("Output exists, skipping {}", job.source.display());
            return Ok(FileOutcome::SkippedExisting);
        }

        let size = std::fs::metadata(&job.source)?.len();
        if size > self.config.max_file_size {
            warn!("Skipping {} ({} bytes exceeds limit)", job.source.display(), size);
            return Ok(FileOutcome::SkippedTooLarge { size });
        }

        let code = std::fs::read_to_string(&job.source)?;
        if code.trim().is_empty() {
            debug!("Empty source, skipping {}", job.source.display());
            return Ok(FileOutcome::SkippedEmpty);
        }

        let documentation = Documentation::from_file(&job.documentation)?;
        let documented = self.document_source(language, &documentation, &code)?;

        let backup = if job.in_place() && self.config.backup_in_place && documented != code {
            Some(create_backup(&job.source)?)
        } else {
            None
        };

        write_with_parents(&job.output, &documented)?;
        info!("Documented {} -> {}", job.source.display(), job.output.display());

        Ok(FileOutcome::Written {
            output: job.output.clone(),
            backup,
        })
    }

    /// Document many files. Failures are recorded, never propagated.
    pub fn document_batch(&self, jobs: &[FileJob]) -> BatchReport {
        let started_at = Utc::now();

        let run = |job: &FileJob| {
            let result = self.document_file(job);
            if let Err(e) = &result {
                warn!("Failed to document {}: {}", job.source.display(), e);
            }
            let (outcome, error) = match result {
                Ok(outcome) => (Some(outcome), None),
                Err(e) => (None, Some(e.to_string())),
            };
            FileReport {
                source: job.source.clone(),
                outcome,
                error,
                finished_at: Utc::now(),
            }
        };

        let files: Vec<FileReport> = if self.config.parallel {
            jobs.par_iter().map(run).collect()
        } else {
            jobs.iter().map(run).collect()
        };

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            files,
        };
        info!(
            "Batch finished: {} written, {} skipped, {} failed",
            report.written(),
            report.skipped(),
            report.failed()
        );
        report
    }

    /// Pair supported source files under `root` with their documentation
    /// and an output path. Both mirror the source layout: `root/a/x.py`
    /// reads `tales_dir/a/x.py.json` and writes `output_dir/a/x.py`. Files
    /// without documentation are left out.
    pub fn plan_directory(
        &self,
        root: &Path,
        tales_dir: &Path,
        output_dir: &Path,
        recursive: bool,
    ) -> Result<Vec<FileJob>> {
        let patterns: HashSet<String> = self.config.exclude_patterns.iter().cloned().collect();
        let mut jobs = Vec::new();

        for source in find_source_files(root, recursive, &patterns)? {
            let relative = source.strip_prefix(root).map_err(|e| {
                TransformError::Config(format!("{} is outside {}: {}", source.display(), root.display(), e))
            })?;
            let mut tale_name = relative.as_os_str().to_os_string();
            tale_name.push(".json");
            let tale = safe_path_join(tales_dir, Path::new(&tale_name))?;
            if !tale.is_file() {
                debug!("No documentation for {}", source.display());
                continue;
            }
            let output = safe_path_join(output_dir, relative)?;
            jobs.push(FileJob::new(source.clone(), tale, output));
        }

        info!("Planned {} files under {}", jobs.len(), root.display());
        Ok(jobs)
    }
}
