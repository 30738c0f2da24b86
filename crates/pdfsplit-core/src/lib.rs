//! Section detection and splitting for multi-page agreements
//!
//! Each page's leading lines are matched against a registry of header
//! signatures, the per-page observations are folded into section ranges,
//! and the ranges are merged, filtered and numbered before one PDF per
//! section is written next to an analysis report.
//!
//! - `patterns`: header signatures per section type
//! - `classifier`: best signature for one page
//! - `builder`: observations -> candidate ranges
//! - `merge`: merge & filter policy, fallback section
//! - `report`: analysis text
//! - `source` / `split`: lopdf text extraction and page-range writing
//! - `pipeline`: `process_document`, `process_file`, `process_batch`

pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod merge;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod split;
pub mod types;

#[cfg(test)]
mod test_support;

pub use builder::{build_sections, SectionBuilder};
pub use classifier::{ClassifierOptions, PageClassifier};
pub use config::SplitConfig;
pub use error::SplitError;
pub use merge::{finalize_sections, MergePolicy};
pub use patterns::{PatternRegistry, PatternRule};
pub use pipeline::{
    analyze_document, process_batch, process_document, process_file, Analysis, BatchSummary,
    DocumentOutcome, DocumentReport, SectionWrite,
};
pub use report::{format_report, AnalysisReport, REPORT_FILE_NAME};
pub use source::{PageTexts, PdfDocument, TextSource};
pub use split::SectionWriter;
pub use types::{FinalSection, PageObservation, SectionRange, SectionType};

/// Classify, build and merge pre-extracted page texts with the built-in
/// agreement signatures and default policy
pub fn detect_sections<S: AsRef<str>>(pages: &[S]) -> Result<Vec<FinalSection>, SplitError> {
    let registry = PatternRegistry::agreement()?;
    let texts = PageTexts::new(pages.iter().map(|p| p.as_ref()));
    Ok(analyze_document(&texts, &SplitConfig::default(), &registry)?.sections)
}
