//! Command-line interface for the segmenter.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{load_settings, SegmenterSettings, SplitterOverrides};
use crate::error::{Result, SegmenterError};
use crate::output::{render, save_segments, unique_report_names, OutputFormat, SegmentReport};
use crate::splitting::{DocumentSplitter, DocumentType, SplitterFactory, SplitterKind};
use crate::text::normalize;
use crate::types::{keys, Document, Segment};

/// Characters of segment text shown in summary previews.
const PREVIEW_CHARS: usize = 60;

/// Legal Segmenter - Split statutes and contracts into retrieval-sized segments.
#[derive(Parser)]
#[command(name = "legal-segmenter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split text files into segments.
    Segment {
        /// UTF-8 text files to split
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Document type (LAW, REGULATION, CONTRACT, CONTRACT_TEMPLATE, CASE, UNKNOWN).
        /// Guessed from the file name when omitted.
        #[arg(short = 't', long)]
        doc_type: Option<DocumentType>,

        /// YAML settings file with per-splitter overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Token budget per segment, for every splitter
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Overlap in characters between fragments of an oversized unit
        #[arg(long)]
        overlap: Option<usize>,

        /// Disable book/chapter/section tracking for statutes
        #[arg(long)]
        flat: bool,

        /// Normalize line endings and full-width characters before splitting
        #[arg(long)]
        normalize: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Summary)]
        format: ReportFormat,

        /// Write one report per file into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which splitter each file name selects.
    Detect {
        /// File names to classify
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// How segment reports are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable overview with previews
    Summary,
    Json,
    Yaml,
}

impl ReportFormat {
    /// Serialized format; summaries are saved as JSON.
    fn output_format(self) -> OutputFormat {
        match self {
            Self::Yaml => OutputFormat::Yaml,
            Self::Json | Self::Summary => OutputFormat::Json,
        }
    }
}

/// Options of the segment command.
struct SegmentOptions<'a> {
    doc_type: Option<DocumentType>,
    normalize: bool,
    format: ReportFormat,
    output: Option<&'a Path>,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            files,
            doc_type,
            config,
            max_tokens,
            overlap,
            flat,
            normalize,
            format,
            output,
        } => {
            let overrides = SplitterOverrides {
                max_tokens,
                overlap,
                hierarchical: flat.then_some(false),
            };
            let settings = build_settings(config.as_deref(), &overrides)?;
            let options = SegmentOptions {
                doc_type,
                normalize,
                format,
                output: output.as_deref(),
            };
            segment_command(&files, &settings, &options)
        }
        Commands::Detect { files } => {
            detect_command(&files);
            Ok(())
        }
    }
}

/// Load settings, apply command-line overrides and validate the result.
fn build_settings(
    config: Option<&Path>,
    overrides: &SplitterOverrides,
) -> Result<SegmenterSettings> {
    let settings = match config {
        Some(path) => load_settings(path)?,
        None => SegmenterSettings::default(),
    };
    let settings = if overrides.is_empty() {
        settings
    } else {
        settings.with_global_overrides(overrides)
    };
    settings.validate()?;
    Ok(settings)
}

/// Read a file as UTF-8 text.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| SegmenterError::InputNotUtf8 {
        path: path.to_path_buf(),
    })
}

/// File name component of a path, lossily converted.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Build the document for a file, with file-derived base metadata.
fn load_document(path: &Path, normalize_text: bool) -> Result<Document> {
    let text = read_text(path)?;
    let text = if normalize_text { normalize(&text) } else { text };

    Ok(Document::new(text)
        .with_metadata(keys::ORIGINAL_FILENAME, display_name(path))
        .with_metadata("source", path.display().to_string())
        .with_metadata("indexed_at", chrono::Utc::now().to_rfc3339()))
}

/// Execute the segment command.
fn segment_command(
    files: &[PathBuf],
    settings: &SegmenterSettings,
    options: &SegmentOptions<'_>,
) -> Result<()> {
    if let Some(output_dir) = options.output {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(SegmenterError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Output path is not a directory: {}", output_dir.display()),
            )));
        }
    }

    let factory = SplitterFactory::new(*settings);

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let sources: Vec<String> = files.iter().map(|path| path.display().to_string()).collect();
    let file_names = unique_report_names(&sources, options.format.output_format());

    for (path, file_name) in files.iter().zip(&file_names) {
        pb.set_message(format!("Splitting {}...", path.display()));

        if let Err(e) = process_file(&factory, path, file_name, options, &pb) {
            pb.finish_and_clear();
            return Err(e);
        }
    }

    pb.finish_and_clear();
    Ok(())
}

/// Split, optionally save, and report one file.
fn process_file(
    factory: &SplitterFactory,
    path: &Path,
    file_name: &str,
    options: &SegmentOptions<'_>,
    pb: &ProgressBar,
) -> Result<()> {
    let report = split_file(factory, path, options)?;

    let saved = match options.output {
        Some(output_dir) => Some(save_segments(
            output_dir,
            file_name,
            &report,
            options.format.output_format(),
        )?),
        None => None,
    };

    pb.suspend(|| print_report(&report, options.format, saved.as_deref()))
}

/// Split one file with the splitter its type or name selects.
fn split_file(
    factory: &SplitterFactory,
    path: &Path,
    options: &SegmentOptions<'_>,
) -> Result<SegmentReport> {
    let document = load_document(path, options.normalize)?;

    let kind = match options.doc_type {
        Some(doc_type) => doc_type.splitter_kind(),
        None => SplitterFactory::resolve(&display_name(path)),
    };
    let splitter = factory.splitter(kind);

    tracing::debug!(
        path = %path.display(),
        %kind,
        chars = document.text.chars().count(),
        "Splitting file"
    );
    let segments = splitter.split(&document);

    Ok(SegmentReport::new(path.display().to_string(), splitter.kind(), segments))
}

/// Print a report to stdout.
fn print_report(report: &SegmentReport, format: ReportFormat, saved: Option<&Path>) -> Result<()> {
    match (format, saved) {
        (_, Some(path)) => {
            println!(
                "{} {} ({} segments)",
                style("Saved to:").green().bold(),
                path.display(),
                report.total_segments
            );
        }
        (ReportFormat::Summary, None) => print_summary(report),
        (format, None) => print!("{}", render(report, format.output_format())?),
    }
    Ok(())
}

/// Print a human-readable overview of a report.
fn print_summary(report: &SegmentReport) {
    println!(
        "{} {} with the {} splitter",
        style("Segmented").bold(),
        style(&report.source).cyan(),
        style(report.splitter).green()
    );
    println!("  Segments: {}", report.total_segments);

    let mut split_types: BTreeMap<&str, usize> = BTreeMap::new();
    for segment in &report.segments {
        *split_types.entry(segment.split_type().unwrap_or("-")).or_default() += 1;
    }
    for (split_type, count) in &split_types {
        println!("  {split_type}: {count}");
    }

    if let Some(name) = report
        .segments
        .first()
        .and_then(|s| s.meta_str(keys::LAW_NAME))
    {
        println!("  Law: {}", style(name).green());
    }

    println!();
    for (i, segment) in report.segments.iter().enumerate() {
        println!("  {}", style(segment_label(i, segment)).bold());
        println!("{}", preview(&segment.text));
    }
}

/// Heading line for one segment in a summary.
fn segment_label(index: usize, segment: &Segment) -> String {
    let location = segment
        .meta_str(keys::HIERARCHY_PATH)
        .or_else(|| segment.meta_str(keys::CLAUSE_NUMBER))
        .unwrap_or("");
    let split_type = segment.split_type().unwrap_or("-");

    match segment.meta_u64(keys::PART) {
        Some(part) => format!(
            "[{}] {location} ({split_type}, part {part}/{})",
            index + 1,
            segment.meta_u64(keys::TOTAL_PARTS).unwrap_or(part)
        ),
        None => format!("[{}] {location} ({split_type})", index + 1),
    }
}

/// Indented, wrapped start of a segment's text.
fn preview(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .take(PREVIEW_CHARS)
        .collect();
    let ellipsis = if text.chars().count() > PREVIEW_CHARS { "…" } else { "" };

    let options = textwrap::Options::new(76)
        .initial_indent("      ")
        .subsequent_indent("      ");
    textwrap::fill(&format!("{flat}{ellipsis}"), options)
}

/// Execute the detect command.
fn detect_command(files: &[PathBuf]) {
    for path in files {
        let name = display_name(path);
        let kind = SplitterFactory::resolve(&name);
        let kind = match kind {
            SplitterKind::Legal => style(kind).green(),
            SplitterKind::Contract => style(kind).cyan(),
            SplitterKind::Generic => style(kind).dim(),
        };
        println!("{}\t{kind}", path.display());
    }
}
