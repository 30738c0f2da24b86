//! Page text extraction
//!
//! The classifier only needs "page index -> text". A page whose text cannot be
//! decoded (scanned image, unsupported font encoding) reads as empty; only a
//! document that cannot be opened at all is an error.

use crate::error::SplitError;
use lopdf::{Document, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Page-addressable text. Indexes are 0-based.
pub trait TextSource {
    fn page_count(&self) -> u32;

    /// Text of one page, empty when unreadable
    fn page_text(&self, page_index: u32) -> String;
}

/// Text already extracted by another tool, one entry per page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTexts(pub Vec<String>);

impl PageTexts {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(pages.into_iter().map(Into::into).collect())
    }
}

impl TextSource for PageTexts {
    fn page_count(&self) -> u32 {
        self.0.len() as u32
    }

    fn page_text(&self, page_index: u32) -> String {
        self.0
            .get(page_index as usize)
            .cloned()
            .unwrap_or_default()
    }
}

/// A parsed PDF held in memory
pub struct PdfDocument {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, SplitError> {
        let doc = Document::load(path).map_err(|e| {
            SplitError::ExtractionError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_document(doc)
    }

    pub fn load_mem(bytes: &[u8]) -> Result<Self, SplitError> {
        let doc =
            Document::load_mem(bytes).map_err(|e| SplitError::ExtractionError(e.to_string()))?;
        Self::from_document(doc)
    }

    fn from_document(doc: Document) -> Result<Self, SplitError> {
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(SplitError::ExtractionError("Document has no pages".into()));
        }
        Ok(Self { doc, pages })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }
}

impl TextSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page_index: u32) -> String {
        let page_number = page_index + 1;
        match self.doc.extract_text(&[page_number]) {
            Ok(text) => {
                if text.trim().is_empty() {
                    tracing::debug!("P{}: no extractable text", page_number);
                }
                text
            }
            Err(e) => {
                tracing::debug!("P{}: text extraction error: {}", page_number, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;

    #[test]
    fn test_page_texts_out_of_range_is_empty() {
        let pages = PageTexts::new(["SOMMAIRE", "CHAPITRE 1 - OBJET"]);
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.page_text(1), "CHAPITRE 1 - OBJET");
        assert_eq!(pages.page_text(5), "");
    }

    #[test]
    fn test_pdf_page_count() {
        let pdf = create_test_pdf(&["SOMMAIRE", "Page deux", "Page trois"]);
        let doc = PdfDocument::load_mem(&pdf).unwrap();
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_pdf_page_text_is_per_page() {
        let pdf = create_test_pdf(&["TABLE DES MATIERES", "SIGNATURES"]);
        let doc = PdfDocument::load_mem(&pdf).unwrap();
        assert!(doc.page_text(0).contains("TABLE DES MATIERES"));
        assert!(!doc.page_text(0).contains("SIGNATURES"));
        assert!(doc.page_text(1).contains("SIGNATURES"));
    }

    #[test]
    fn test_missing_page_reads_as_empty() {
        let pdf = create_test_pdf(&["SOMMAIRE"]);
        let doc = PdfDocument::load_mem(&pdf).unwrap();
        assert_eq!(doc.page_text(7), "");
    }

    #[test]
    fn test_garbage_is_extraction_error() {
        let result = PdfDocument::load_mem(b"%PDF-1.7 definitely not a pdf");
        assert!(matches!(result, Err(SplitError::ExtractionError(_))));
    }

    #[test]
    fn test_missing_file_is_extraction_error() {
        let result = PdfDocument::open(Path::new("/nonexistent/convention.pdf"));
        assert!(matches!(result, Err(SplitError::ExtractionError(_))));
    }
}
