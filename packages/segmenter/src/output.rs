//! Serialized segment reports.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::file_stem;
use crate::splitting::SplitterKind;
use crate::types::Segment;

/// On-disk format of a segment report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// The segments produced for one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    /// Input the segments came from.
    pub source: String,

    /// Splitter family that produced them.
    pub splitter: SplitterKind,

    pub total_segments: usize,

    pub segments: Vec<Segment>,
}

impl SegmentReport {
    /// Create a report.
    #[must_use]
    pub fn new(source: impl Into<String>, splitter: SplitterKind, segments: Vec<Segment>) -> Self {
        Self {
            source: source.into(),
            splitter,
            total_segments: segments.len(),
            segments,
        }
    }
}

/// Render a report as pretty-printed JSON.
pub fn to_json(report: &SegmentReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Render a report as YAML with a document start marker.
pub fn to_yaml(report: &SegmentReport) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(report)?;
    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Render a report in the given format.
pub fn render(report: &SegmentReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Yaml => to_yaml(report),
    }
}

fn report_stem(source: &str) -> &str {
    let stem = file_stem(source);
    if stem.is_empty() {
        "document"
    } else {
        stem
    }
}

/// Output file name for a report: `<stem>.segments.<ext>`.
#[must_use]
pub fn report_file_name(source: &str, format: OutputFormat) -> String {
    format!("{}.segments.{}", report_stem(source), format.extension())
}

/// Output file names for a batch of sources, one per source and all distinct.
///
/// Sources sharing a stem (`a/民法典.txt`, `b/民法典.txt`) get a numeric
/// suffix from the second one on: `民法典.segments.json`, `民法典-2.segments.json`.
#[must_use]
pub fn unique_report_names(sources: &[String], format: OutputFormat) -> Vec<String> {
    let mut used = HashSet::new();
    sources
        .iter()
        .map(|source| {
            let stem = report_stem(source);
            let mut name = report_file_name(source, format);
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{stem}-{n}.segments.{}", format.extension());
                n += 1;
            }
            if n > 2 {
                tracing::warn!(source = %source, file = %name, "Report name taken, renamed");
            }
            name
        })
        .collect()
}

/// Save a report into `output_dir` as `file_name`.
///
/// Writes to a temp file, syncs it, then renames over the destination so an
/// interrupted run never leaves a truncated report behind.
///
/// # Returns
/// Path to the saved file
pub fn save_segments(
    output_dir: &Path,
    file_name: &str,
    report: &SegmentReport,
    format: OutputFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let output_file = output_dir.join(file_name);
    let temp_file = output_dir.join(format!(".{file_name}.tmp"));

    let content = render(report, format)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;
    tracing::debug!(
        path = %output_file.display(),
        segments = report.total_segments,
        "Saved segments"
    );

    Ok(output_file)
}
