//! Section artifact writer
//!
//! Copies the source document, deletes every page outside the section,
//! prunes objects no longer referenced and saves the result.

use crate::error::SplitError;
use crate::source::PdfDocument;
use lopdf::Document;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one inclusive, 1-based page range of the source as its own file
pub trait SectionWriter {
    fn write_section(&self, start: u32, end: u32, path: &Path) -> Result<(), SplitError>;
}

/// Build a document holding only pages `start..=end` (1-indexed)
pub fn extract_page_range(doc: &Document, start: u32, end: u32) -> Result<Document, SplitError> {
    let page_count = doc.get_pages().len() as u32;

    if start == 0 || start > end {
        return Err(SplitError::WriteError {
            path: String::new(),
            message: format!("Invalid page range {}-{}", start, end),
        });
    }
    if end > page_count {
        return Err(SplitError::WriteError {
            path: String::new(),
            message: format!(
                "Page {} does not exist (document has {} pages)",
                end, page_count
            ),
        });
    }

    let mut new_doc = doc.clone();

    // delete from the back so page numbers stay valid
    let mut pages_to_delete: Vec<u32> = (1..=page_count)
        .filter(|p| *p < start || *p > end)
        .collect();
    pages_to_delete.reverse();
    for page_num in pages_to_delete {
        new_doc.delete_pages(&[page_num]);
    }

    new_doc.prune_objects();
    new_doc.compress();

    Ok(new_doc)
}

impl SectionWriter for PdfDocument {
    fn write_section(&self, start: u32, end: u32, path: &Path) -> Result<(), SplitError> {
        let write_error = |message: String| SplitError::WriteError {
            path: path.display().to_string(),
            message,
        };

        let mut section = extract_page_range(self.document(), start, end).map_err(|e| match e {
            SplitError::WriteError { message, .. } => write_error(message),
            other => other,
        })?;

        let file = File::create(path).map_err(|e| write_error(e.to_string()))?;
        let mut out = BufWriter::new(file);
        let saved = section
            .save_to(&mut out)
            .map_err(|e| write_error(format!("Save failed: {}", e)))
            .and_then(|_| out.flush().map_err(|e| write_error(e.to_string())));

        if saved.is_err() {
            drop(out);
            let _ = std::fs::remove_file(path);
        }
        saved
    }
}
