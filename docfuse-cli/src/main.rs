//! docfuse command-line entry point
//!
//! `document` inserts one documentation file into one source file,
//! `batch` does the same for a whole directory, and `fuse` merges chunked
//! documentation into a single file checked against the source.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use docfuse_transform::{
    fuse_chunks, retain_declared, Documentation, DocumentationEngine, EngineConfig, FileJob,
    FileOutcome, Language,
};
use docfuse_utils::logging::{basic_config, LogLevel};

#[derive(Parser)]
#[command(name = "docfuse")]
#[command(about = "Insert generated documentation into Python, PHP, Go and JavaScript/TypeScript sources")]
#[command(version)]
struct Cli {
    /// Log more detail (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration file (TOML, JSON or YAML)
    #[arg(short = 'c', long, global = true, env = "DOCFUSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Document a single source file
    Document {
        /// Source file to document
        #[arg(short = 's', long)]
        source: PathBuf,

        /// Documentation JSON for the source file
        #[arg(short = 'd', long)]
        documentation: PathBuf,

        /// Directory the documented file is written to
        #[arg(short = 'o', long, default_value = "docfuse_output", conflicts_with_all = ["in_place", "diff"])]
        output_path: PathBuf,

        /// Overwrite the source file (a backup is kept)
        #[arg(long, conflicts_with = "diff")]
        in_place: bool,

        /// Print a unified diff instead of writing anything
        #[arg(long)]
        diff: bool,

        /// Language, when it cannot be told from the extension
        #[arg(short = 'l', long)]
        language: Option<LanguageArg>,

        /// Maximum width of inserted comment lines
        #[arg(short = 'w', long)]
        width: Option<usize>,

        /// Line prepended to the file docstring
        #[arg(long)]
        label: Option<String>,
    },

    /// Document every source file in a directory that has documentation
    Batch {
        /// Directory of source files
        #[arg(short = 'p', long)]
        path: PathBuf,

        /// Directory holding `<relative path>.json` documentation files
        #[arg(short = 't', long)]
        tales: PathBuf,

        /// Directory the documented files are written to
        #[arg(short = 'o', long, default_value = "docfuse_output")]
        output_path: PathBuf,

        /// Descend into subdirectories
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Re-process files whose output already exists
        #[arg(long)]
        force: bool,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,

        /// Write a JSON report of the run
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Merge chunked documentation files and drop undeclared names
    Fuse {
        /// Source file the documentation describes
        #[arg(short = 's', long)]
        source: PathBuf,

        /// Chunk documentation files, in order
        #[arg(long = "chunk", required = true)]
        chunks: Vec<PathBuf>,

        /// Where to write the merged documentation (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Language, when it cannot be told from the extension
        #[arg(short = 'l', long)]
        language: Option<LanguageArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageArg {
    Python,
    Php,
    Go,
    Javascript,
    Typescript,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Python => Language::Python,
            LanguageArg::Php => Language::Php,
            LanguageArg::Go => Language::Go,
            LanguageArg::Javascript | LanguageArg::Typescript => Language::JavaScript,
        }
    }
}

fn resolve_language(arg: Option<LanguageArg>, source: &Path) -> Result<Language> {
    match arg.map(Language::from).or_else(|| Language::from_path(source)) {
        Some(language) => Ok(language),
        None => bail!(
            "cannot tell the language of {}; pass --language",
            source.display()
        ),
    }
}

fn load_config(path: Option<&Path>, adjust: impl FnOnce(&mut EngineConfig)) -> Result<EngineConfig> {
    EngineConfig::load(path, adjust).context("failed to load configuration")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    basic_config(Some(LogLevel::from_verbosity(cli.verbose)))?;

    match cli.command {
        Commands::Document {
            source,
            documentation,
            output_path,
            in_place,
            diff,
            language,
            width,
            label,
        } => {
            let language = resolve_language(language, &source)?;
            let config = load_config(cli.config.as_deref(), |config| {
                config.skip_existing_outputs = false;
                if let Some(width) = width {
                    config.max_line_width = width;
                }
                if label.is_some() {
                    config.docstring_label = label;
                }
            })?;
            let engine = DocumentationEngine::new(config);

            if diff {
                let code = std::fs::read_to_string(&source)
                    .with_context(|| format!("failed to read {}", source.display()))?;
                let tale = Documentation::from_file(&documentation)?;
                let documented = engine.document_source(language, &tale, &code)?;
                let name = source.display().to_string();
                print!(
                    "{}",
                    similar::TextDiff::from_lines(&code, &documented)
                        .unified_diff()
                        .header(&name, &name)
                );
                return Ok(());
            }

            let output = if in_place {
                source.clone()
            } else {
                let file_name = source
                    .file_name()
                    .with_context(|| format!("{} is not a file", source.display()))?;
                output_path.join(file_name)
            };

            let job = FileJob::new(&source, &documentation, output).with_language(language);
            match engine.document_file(&job) {
                Ok(FileOutcome::Written { output, backup }) => {
                    println!("Documented {} -> {}", source.display(), output.display());
                    if let Some(backup) = backup {
                        println!("Original saved to {}", backup.display());
                    }
                }
                Ok(other) => println!("Skipped {}: {:?}", source.display(), other),
                Err(e) => {
                    eprintln!("Failed to document {}: {}", source.display(), e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Batch {
            path,
            tales,
            output_path,
            recursive,
            force,
            sequential,
            report,
        } => {
            let config = load_config(cli.config.as_deref(), |config| {
                if force {
                    config.skip_existing_outputs = false;
                }
                if sequential {
                    config.parallel = false;
                }
            })?;
            let engine = DocumentationEngine::new(config);

            let jobs = engine
                .plan_directory(&path, &tales, &output_path, recursive)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            if jobs.is_empty() {
                println!("No documented source files found under {}", path.display());
                return Ok(());
            }

            let summary = engine.document_batch(&jobs);
            for file in summary.files.iter().filter(|f| f.error.is_some()) {
                eprintln!(
                    "Failed: {} ({})",
                    file.source.display(),
                    file.error.as_deref().unwrap_or_default()
                );
            }
            println!(
                "{} written, {} skipped, {} failed in {} ms",
                summary.written(),
                summary.skipped(),
                summary.failed(),
                summary.duration().num_milliseconds()
            );

            if let Some(report) = report {
                std::fs::write(&report, serde_json::to_string_pretty(&summary)?)
                    .with_context(|| format!("failed to write {}", report.display()))?;
                println!("Report saved to {}", report.display());
            }

            if summary.all_failed() {
                std::process::exit(1);
            }
        }

        Commands::Fuse {
            source,
            chunks,
            output,
            language,
        } => {
            let language = resolve_language(language, &source)?;
            let code = std::fs::read_to_string(&source)
                .with_context(|| format!("failed to read {}", source.display()))?;
            let parts = chunks
                .iter()
                .map(|chunk| Documentation::from_file(chunk))
                .collect::<docfuse_transform::Result<Vec<_>>>()?;

            let (fused, dropped) = retain_declared(&fuse_chunks(parts), language, &code);
            for (kind, name) in &dropped {
                eprintln!("Dropped {} {}: not declared in {}", kind, name, source.display());
            }

            let json = fused.to_json_pretty()?;
            match output {
                Some(output) => {
                    docfuse_utils::write_with_parents(&output, &json)?;
                    println!("Documentation saved to {}", output.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
