//! Per-page header classification
//!
//! Only the first few significant lines of a page are looked at. Body text
//! quoting "annexe B" or "chapitre 3" further down the page must not open a
//! section.

use crate::patterns::PatternRegistry;
use crate::types::{HeaderMatch, PageObservation, SectionType};

/// How much of a page is considered a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Significant lines collected from the top of the page
    pub max_lines: usize,
    /// Leading significant lines that may carry a header
    pub header_lines: usize,
    /// Confidence removed per line below the first
    pub line_penalty: u8,
    /// Header text kept for reporting, in characters
    pub header_max_chars: usize,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            max_lines: 3,
            header_lines: 2,
            line_penalty: 10,
            header_max_chars: 80,
        }
    }
}

/// A type that matched on the page, before arbitration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub section_type: &'a SectionType,
    pub confidence: u8,
    pub line: &'a str,
}

pub struct PageClassifier<'r> {
    registry: &'r PatternRegistry,
    options: ClassifierOptions,
}

impl<'r> PageClassifier<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self::with_options(registry, ClassifierOptions::default())
    }

    pub fn with_options(registry: &'r PatternRegistry, options: ClassifierOptions) -> Self {
        Self { registry, options }
    }

    /// Classify one page. Never fails: empty or unreadable text is "none".
    pub fn classify(&self, page_index: u32, text: &str) -> PageObservation {
        let lines = significant_lines(text, self.options.max_lines);
        let header_lines = &lines[..lines.len().min(self.options.header_lines)];

        if header_lines.is_empty() {
            return PageObservation::none(page_index);
        }

        let folded: Vec<String> = header_lines.iter().map(|l| l.to_uppercase()).collect();

        let mut candidates = Vec::new();
        for (section_type, rules) in self.registry.iter() {
            // first rule to hit any header line wins for this type
            let hit = rules.iter().find_map(|rule| {
                folded
                    .iter()
                    .position(|line| rule.is_match(line))
                    .map(|line_idx| (rule.confidence(), line_idx))
            });

            if let Some((confidence, line_idx)) = hit {
                let penalty = (line_idx as u32 * self.options.line_penalty as u32).min(255) as u8;
                candidates.push(Candidate {
                    section_type,
                    confidence: confidence.saturating_sub(penalty),
                    line: header_lines[line_idx],
                });
            }
        }

        match best_candidate(&candidates) {
            Some(best) => {
                tracing::debug!(
                    "P{}: '{}' ({}%) - {}",
                    page_index + 1,
                    best.section_type,
                    best.confidence,
                    truncate_chars(best.line, 50)
                );
                PageObservation {
                    page_index,
                    matched: Some(HeaderMatch {
                        section_type: best.section_type.clone(),
                        confidence: best.confidence,
                        header: truncate_chars(best.line, self.options.header_max_chars)
                            .to_string(),
                    }),
                }
            }
            None => PageObservation::none(page_index),
        }
    }

    /// Classify every page of a document, in page order
    pub fn classify_pages<'t, I>(&self, pages: I) -> Vec<PageObservation>
    where
        I: IntoIterator<Item = &'t str>,
    {
        pages
            .into_iter()
            .enumerate()
            .map(|(idx, text)| self.classify(idx as u32, text))
            .collect()
    }
}

/// Highest confidence wins; on a tie the earlier-declared type wins.
///
/// `candidates` must be in registry declaration order.
pub fn best_candidate<'c, 'a>(candidates: &'c [Candidate<'a>]) -> Option<&'c Candidate<'a>> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    })
}

/// Trimmed lines that can be headers: skips blanks, bare page numbers and
/// fragments of two characters or less
pub fn significant_lines(text: &str, max_lines: usize) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.chars().all(char::is_numeric)
                && line.chars().count() > 2
        })
        .take(max_lines)
        .collect()
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
