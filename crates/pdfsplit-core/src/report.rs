//! Human-readable analysis report

use crate::types::FinalSection;
use std::fmt;

pub const REPORT_FILE_NAME: &str = "analysis_report.txt";

/// Analysis report for one document, rendered through `Display`.
///
/// Sections are listed in the order given, numbered from 1.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisReport<'a> {
    pub document_name: &'a str,
    pub total_pages: u32,
    pub sections: &'a [FinalSection],
}

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Document Analysis: {}", self.document_name)?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f)?;
        writeln!(f, "Total pages: {}", self.total_pages)?;
        writeln!(f, "Sections found: {}", self.sections.len())?;
        writeln!(f)?;

        for (idx, section) in self.sections.iter().enumerate() {
            writeln!(f, "{}. {}", idx + 1, section.label())?;
            writeln!(
                f,
                "   Pages: {}-{} ({} pages)",
                section.start(),
                section.end(),
                section.page_count()
            )?;
            writeln!(f, "   Confidence: {}%", section.confidence())?;
            if !section.header().is_empty() {
                writeln!(f, "   Header: {}", section.header())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Render the analysis report for one document
pub fn format_report(document_name: &str, total_pages: u32, sections: &[FinalSection]) -> String {
    AnalysisReport {
        document_name,
        total_pages,
        sections,
    }
    .to_string()
}
