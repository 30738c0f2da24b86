//! Values that flow between the classifier, builder and merge engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the whole-document section emitted when nothing else survives
pub const FALLBACK_LABEL: &str = "Complete_Agreement";

/// Open-ended section label. New labels come from the pattern registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionType(String);

impl SectionType {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_LABEL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A header hit on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub section_type: SectionType,
    pub confidence: u8,
    pub header: String,
}

/// Classification result for one page (0-based index)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageObservation {
    pub page_index: u32,
    pub matched: Option<HeaderMatch>,
}

impl PageObservation {
    pub fn none(page_index: u32) -> Self {
        Self {
            page_index,
            matched: None,
        }
    }

    pub fn matched(
        page_index: u32,
        section_type: impl Into<SectionType>,
        confidence: u8,
        header: impl Into<String>,
    ) -> Self {
        Self {
            page_index,
            matched: Some(HeaderMatch {
                section_type: section_type.into(),
                confidence,
                header: header.into(),
            }),
        }
    }

    pub fn confidence(&self) -> u8 {
        self.matched.as_ref().map_or(0, |m| m.confidence)
    }

    pub fn header(&self) -> &str {
        self.matched.as_ref().map_or("", |m| m.header.as_str())
    }
}

/// Contiguous span of pages (1-based, inclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRange {
    pub section_type: SectionType,
    pub start: u32,
    pub end: u32,
    pub confidence: u8,
    pub header: String,
}

impl SectionRange {
    pub fn new(section_type: impl Into<SectionType>, start: u32, end: u32, confidence: u8) -> Self {
        Self {
            section_type: section_type.into(),
            start,
            end,
            confidence,
            header: String::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// A section in the terminal output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSection {
    #[serde(flatten)]
    pub range: SectionRange,
    /// Present only when several sections share the same type
    pub sequence: Option<u32>,
}

impl FinalSection {
    pub fn section_type(&self) -> &SectionType {
        &self.range.section_type
    }

    pub fn start(&self) -> u32 {
        self.range.start
    }

    pub fn end(&self) -> u32 {
        self.range.end
    }

    pub fn confidence(&self) -> u8 {
        self.range.confidence
    }

    pub fn header(&self) -> &str {
        &self.range.header
    }

    pub fn page_count(&self) -> u32 {
        self.range.page_count()
    }

    /// Section type with its two-digit sequence suffix, e.g. `Annexe_02`
    pub fn label(&self) -> String {
        match self.sequence {
            Some(seq) => format!("{}_{:02}", self.range.section_type, seq),
            None => self.range.section_type.to_string(),
        }
    }

    /// Output artifact name, e.g. `Annexe_02_p10-13.pdf`
    pub fn file_name(&self) -> String {
        format!("{}_p{}-{}.pdf", self.label(), self.range.start, self.range.end)
    }
}
