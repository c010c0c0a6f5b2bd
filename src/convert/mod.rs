//! Conversion of `.agenda` archives to `.enex` files.
//!
//! [`convert_file`] and [`convert_bytes`] turn one archive into an
//! in-memory `.enex` document. [`BatchConverter`] handles many archives,
//! writes one `.enex` file per archive and never lets one failing archive
//! stop the others.
//!
//! # Example
//!
//! ```no_run
//! use agenda2enex::convert::{discover_agendas, BatchConverter, ConvertOptions};
//!
//! fn main() -> agenda2enex::Result<()> {
//!     let inputs = discover_agendas("notebooks")?;
//!     let batch = BatchConverter::new("out", ConvertOptions::new().lenient());
//!     for item in batch.run(&inputs) {
//!         println!("{} -> {}", item.input.display(), item.output.display());
//!     }
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::diagnostics::{Diagnostic, Report};
use crate::error::{Error, Result};
use crate::parser::AgendaParser;
use crate::render::{ConversionStats, EnexRenderer, ErrorMode, RenderOptions};

/// File extension of Agenda archives.
pub const AGENDA_EXTENSION: &str = "agenda";

/// File extension of written export documents.
pub const ENEX_EXTENSION: &str = "enex";

/// Options for archive conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Rendering options
    pub render: RenderOptions,

    /// Convert batch inputs one after another instead of in parallel
    pub sequential: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the error mode for undecodable paragraphs.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.render = self.render.with_error_mode(mode);
        self
    }

    /// Skip undecodable paragraphs instead of failing the archive.
    pub fn lenient(self) -> Self {
        self.with_error_mode(ErrorMode::Lenient)
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.sequential = true;
        self
    }
}

/// Result of converting one archive.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Notebook name (archive file stem)
    pub notebook: String,

    /// The complete `.enex` document
    pub content: String,

    /// Recoverable problems found during conversion
    pub diagnostics: Vec<Diagnostic>,

    /// Conversion statistics
    pub stats: ConversionStats,
}

impl ConvertResult {
    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    /// Append this archive's diagnostics to a report.
    pub fn report_into(&self, report: &mut Report) {
        report.add_diagnostics(&self.notebook, &self.diagnostics);
    }
}

/// Convert the `.agenda` file at `path`.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let path = path.as_ref();
    let parsed = AgendaParser::open(path)?.parse()?;
    let mut archive = parsed.archive;
    let result = EnexRenderer::new(options.render.clone()).render(&parsed.agenda, &mut archive)?;

    Ok(ConvertResult {
        notebook: notebook_name(path),
        content: result.content,
        diagnostics: result.diagnostics,
        stats: result.stats,
    })
}

/// Convert an `.agenda` archive held in memory.
///
/// `notebook` names the archive in diagnostics and reports.
pub fn convert_bytes(
    data: impl Into<Vec<u8>>,
    notebook: impl Into<String>,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let parsed = AgendaParser::from_bytes(data)?.parse()?;
    let mut archive = parsed.archive;
    let result = EnexRenderer::new(options.render.clone()).render(&parsed.agenda, &mut archive)?;

    Ok(ConvertResult {
        notebook: notebook.into(),
        content: result.content,
        diagnostics: result.diagnostics,
        stats: result.stats,
    })
}

/// Collect the `.agenda` files to convert.
///
/// A file path yields itself. A directory is searched recursively and the
/// matches are returned in sorted order.
pub fn discover_agendas<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(Error::Other(format!(
            "Input not found: {}",
            path.display()
        )));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.map_err(|e| Error::Other(e.to_string()))?;
        if entry.file_type().is_file() && is_agenda(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    log::debug!("Found {} archives under {}", found.len(), path.display());
    Ok(found)
}

fn is_agenda(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(AGENDA_EXTENSION))
}

/// Notebook name for an archive path: its file stem.
pub fn notebook_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path for `input` inside `output_dir`: `<stem>.enex`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{}", notebook_name(input), ENEX_EXTENSION))
}

/// Outcome of one archive in a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Source archive
    pub input: PathBuf,

    /// Target `.enex` file (written only on success)
    pub output: PathBuf,

    /// Conversion result or the error that stopped this archive
    pub outcome: Result<ConvertResult>,
}

impl BatchItem {
    /// Check if the archive was converted and written.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Notebook name of the input archive.
    pub fn notebook(&self) -> String {
        notebook_name(&self.input)
    }
}

/// Converts many archives into one output directory.
#[derive(Debug, Clone)]
pub struct BatchConverter {
    output_dir: PathBuf,
    options: ConvertOptions,
}

impl BatchConverter {
    /// Create a batch converter writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, options: ConvertOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Convert every input. Results keep the order of `inputs`.
    pub fn run(&self, inputs: &[PathBuf]) -> Vec<BatchItem> {
        self.run_with_progress(inputs, |_| {})
    }

    /// Convert every input, calling `on_done` as each archive finishes.
    ///
    /// Archives are independent; unless `sequential` is set they are
    /// converted in parallel and `on_done` may be called from several
    /// threads.
    pub fn run_with_progress<F>(&self, inputs: &[PathBuf], on_done: F) -> Vec<BatchItem>
    where
        F: Fn(&BatchItem) + Sync,
    {
        let convert = |input: &PathBuf| {
            let item = self.convert_one(input);
            on_done(&item);
            item
        };

        if self.options.sequential {
            inputs.iter().map(convert).collect()
        } else {
            inputs.par_iter().map(convert).collect()
        }
    }

    /// Convert one archive and write its `.enex` file.
    ///
    /// Nothing is written unless the whole document rendered.
    pub fn convert_one(&self, input: &Path) -> BatchItem {
        let output = output_path_for(input, &self.output_dir);
        let outcome = convert_file(input, &self.options).and_then(|result| {
            fs::write(&output, &result.content)?;
            log::debug!(
                "Wrote {} ({} notes, {} bytes)",
                output.display(),
                result.stats.note_count,
                result.content_len()
            );
            Ok(result)
        });

        if let Err(ref e) = outcome {
            log::warn!("{}: {}", input.display(), e);
        }

        BatchItem {
            input: input.to_path_buf(),
            output,
            outcome,
        }
    }

    /// Build the report for a finished batch.
    pub fn report(items: &[BatchItem]) -> Report {
        let mut report = Report::new();
        for item in items {
            match &item.outcome {
                Ok(result) => result.report_into(&mut report),
                Err(e) => report.add_failure(&item.notebook(), e),
            }
        }
        report
    }

    /// Sum the statistics of every successful conversion in a batch.
    pub fn totals(items: &[BatchItem]) -> ConversionStats {
        let mut totals = ConversionStats::new();
        for result in items.iter().filter_map(|item| item.outcome.as_ref().ok()) {
            totals.merge(&result.stats);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new().lenient().sequential();
        assert_eq!(options.render.error_mode, ErrorMode::Lenient);
        assert!(options.sequential);

        let defaults = ConvertOptions::default();
        assert_eq!(defaults.render.error_mode, ErrorMode::Strict);
        assert!(!defaults.sequential);
    }

    #[test]
    fn test_output_path_for() {
        let out = output_path_for(Path::new("/in/Work Notes.agenda"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/Work Notes.enex"));
    }

    #[test]
    fn test_discover_agendas_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        File::create(dir.path().join("b.agenda")).unwrap();
        File::create(dir.path().join("a.AGENDA")).unwrap();
        File::create(nested.join("c.agenda")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let found = discover_agendas(dir.path()).unwrap();
        assert_eq!(found.len(), 3);
        let mut sorted = found.clone();
        sorted.sort();
        assert_eq!(found, sorted);
        assert!(found.iter().all(|p| is_agenda(p)));
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.agenda");
        File::create(&file).unwrap();
        assert_eq!(discover_agendas(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_discover_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_agendas(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_batch_failure_is_reported_and_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.agenda");
        fs::write(&input, b"not a zip").unwrap();

        let batch = BatchConverter::new(dir.path(), ConvertOptions::new().sequential());
        let items = batch.run(&[input]);
        assert_eq!(items.len(), 1);
        assert!(!items[0].is_success());
        assert!(!items[0].output.exists());

        let report = BatchConverter::report(&items);
        assert_eq!(report.len(), 1);
        assert_eq!(report.rows()[0].notebook, "broken");
        assert!(report.rows()[0].note.is_empty());
    }
}
