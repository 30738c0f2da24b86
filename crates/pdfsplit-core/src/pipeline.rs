//! Document and batch orchestration
//!
//! One document runs start to finish on one thread: extract, classify every
//! page in order, build, merge/filter, then write the report and one file per
//! section. Batches fan documents out over a rayon pool; a failing document
//! only fails its own entry.

use crate::builder::build_sections;
use crate::classifier::PageClassifier;
use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::merge::finalize_sections;
use crate::patterns::PatternRegistry;
use crate::report::{format_report, REPORT_FILE_NAME};
use crate::source::{PdfDocument, TextSource};
use crate::split::SectionWriter;
use crate::types::{FinalSection, PageObservation};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Classification result for one document, before anything is written
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub total_pages: u32,
    pub sections: Vec<FinalSection>,
    /// Per-page observations, kept only in verbose mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<PageObservation>,
}

/// Outcome of writing one section artifact
#[derive(Debug, Clone, Serialize)]
pub struct SectionWrite {
    pub label: String,
    pub path: PathBuf,
    pub pages: u32,
    pub error: Option<String>,
}

impl SectionWrite {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub document: String,
    pub output_dir: PathBuf,
    pub report_path: PathBuf,
    #[serde(flatten)]
    pub analysis: Analysis,
    #[serde(skip)]
    pub report: String,
    pub writes: Vec<SectionWrite>,
    pub processing_time_ms: u64,
}

impl DocumentReport {
    pub fn files_created(&self) -> usize {
        self.writes.iter().filter(|w| w.succeeded()).count()
    }
}

/// Classify, build and merge without writing anything
pub fn analyze_document<S>(
    source: &S,
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> Result<Analysis, SplitError>
where
    S: TextSource + ?Sized,
{
    let total_pages = source.page_count();
    if total_pages == 0 {
        return Err(SplitError::ExtractionError("Document has no pages".into()));
    }

    let classifier = PageClassifier::with_options(registry, config.classifier);
    let observations: Vec<PageObservation> = (0..total_pages)
        .map(|idx| {
            let observation = classifier.classify(idx, &source.page_text(idx));
            if let Some(hit) = &observation.matched {
                tracing::info!("Page {}: {}", idx + 1, hit.section_type);
            }
            observation
        })
        .collect();

    let candidates = build_sections(&observations);
    tracing::debug!("{} candidate range(s)", candidates.len());

    let sections = finalize_sections(candidates, total_pages, &config.policy);

    Ok(Analysis {
        total_pages,
        sections,
        observations: if config.verbose {
            observations
        } else {
            Vec::new()
        },
    })
}

/// Analyze one document and write its report and section files into `output_dir`.
///
/// A section that fails to write is recorded in its `SectionWrite` and the
/// remaining sections are still attempted.
pub fn process_document<S, W>(
    source: &S,
    writer: &W,
    document_name: &str,
    output_dir: &Path,
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> Result<DocumentReport, SplitError>
where
    S: TextSource + ?Sized,
    W: SectionWriter + ?Sized,
{
    let start_time = Instant::now();
    tracing::info!(
        "Scanning: {} ({} pages)",
        document_name,
        source.page_count()
    );

    let analysis = analyze_document(source, config, registry)?;
    let report = format_report(document_name, analysis.total_pages, &analysis.sections);

    std::fs::create_dir_all(output_dir).map_err(|e| SplitError::WriteError {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let report_path = output_dir.join(REPORT_FILE_NAME);
    std::fs::write(&report_path, &report).map_err(|e| SplitError::WriteError {
        path: report_path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!("Report saved: {}", report_path.display());

    let writes = analysis
        .sections
        .iter()
        .map(|section| {
            let file_name = section.file_name();
            let path = output_dir.join(&file_name);
            let error = match writer.write_section(section.start(), section.end(), &path) {
                Ok(()) => {
                    tracing::info!("Created: {} ({} pages)", file_name, section.page_count());
                    None
                }
                Err(e) => {
                    tracing::error!("Error creating {}: {}", file_name, e);
                    Some(e.to_string())
                }
            };
            SectionWrite {
                label: section.label(),
                path,
                pages: section.page_count(),
                error,
            }
        })
        .collect();

    Ok(DocumentReport {
        document: document_name.to_string(),
        output_dir: output_dir.to_path_buf(),
        report_path,
        analysis,
        report,
        writes,
        processing_time_ms: start_time.elapsed().as_millis() as u64,
    })
}

/// Open a PDF and process it into `config.output_dir_for(path)`
pub fn process_file(
    path: &Path,
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> Result<DocumentReport, SplitError> {
    let document = PdfDocument::open(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let output_dir = config.output_dir_for(path);

    process_document(&document, &document, &name, &output_dir, config, registry)
}

/// Result for one document of a batch
#[derive(Debug)]
pub struct DocumentOutcome {
    pub source: PathBuf,
    pub result: Result<DocumentReport, SplitError>,
}

/// Process every document in parallel. Outcomes come back in input order.
///
/// Fails only if the worker pool cannot be created; per-document failures
/// are reported in their outcome.
pub fn process_batch(
    paths: &[PathBuf],
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> Result<Vec<DocumentOutcome>, SplitError> {
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = config.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| SplitError::ConfigError(format!("Cannot start worker pool: {}", e)))?;

    tracing::info!("Found {} PDF(s)", paths.len());

    let outcomes: Vec<DocumentOutcome> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = process_file(path, config, registry);
                if let Err(e) = &result {
                    tracing::error!("Failed: {}: {}", path.display(), e);
                }
                DocumentOutcome {
                    source: path.clone(),
                    result,
                }
            })
            .collect()
    });

    let summary = BatchSummary::from_outcomes(&outcomes);
    tracing::info!("PDFs processed: {}", summary.processed);
    tracing::info!("Successful: {}", summary.succeeded);
    tracing::info!("Failed: {}", summary.failed);
    tracing::info!("Total files created: {}", summary.files_created);

    Ok(outcomes)
}

/// One line of the batch summary
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub source: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub sections_found: usize,
    pub files_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files_created: usize,
    pub documents: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[DocumentOutcome]) -> Self {
        let documents: Vec<BatchEntry> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => BatchEntry {
                    source: outcome.source.clone(),
                    success: true,
                    output_dir: Some(report.output_dir.clone()),
                    sections_found: report.analysis.sections.len(),
                    files_created: report.files_created(),
                    error: None,
                },
                Err(e) => BatchEntry {
                    source: outcome.source.clone(),
                    success: false,
                    output_dir: None,
                    sections_found: 0,
                    files_created: 0,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let succeeded = documents.iter().filter(|d| d.success).count();
        Self {
            processed: documents.len(),
            succeeded,
            failed: documents.len() - succeeded,
            files_created: documents.iter().map(|d| d.files_created).sum(),
            documents,
        }
    }
}
