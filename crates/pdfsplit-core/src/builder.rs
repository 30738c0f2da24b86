//! Turns the per-page observations of one document into candidate ranges
//!
//! Two states: nothing open, or one range open. A page without a match never
//! closes the open range; only a different section type or the end of the
//! document does. Page indexes come in 0-based and ranges go out 1-based.

use crate::types::{PageObservation, SectionRange, SectionType};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenRange {
    section_type: SectionType,
    start: u32,
    confidence: u8,
    header: String,
}

impl OpenRange {
    fn close(self, end: u32) -> SectionRange {
        SectionRange {
            section_type: self.section_type,
            start: self.start,
            end,
            confidence: self.confidence,
            header: self.header,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BuilderState {
    Idle,
    Open(OpenRange),
}

/// Streaming section builder. Feed observations in page order, then `finish`.
#[derive(Debug)]
pub struct SectionBuilder {
    state: BuilderState,
    ranges: Vec<SectionRange>,
    /// 1-based number of the last page seen
    last_page: u32,
}

impl Default for SectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionBuilder {
    pub fn new() -> Self {
        Self {
            state: BuilderState::Idle,
            ranges: Vec::new(),
            last_page: 0,
        }
    }

    pub fn push(&mut self, observation: &PageObservation) {
        let page = observation.page_index + 1;
        debug_assert!(page > self.last_page, "observations must be in page order");
        self.last_page = page;

        let Some(hit) = &observation.matched else {
            return;
        };

        if let BuilderState::Open(open) = &mut self.state {
            if open.section_type == hit.section_type {
                if hit.confidence > open.confidence {
                    open.confidence = hit.confidence;
                    open.header = hit.header.clone();
                }
                return;
            }
        }

        let next = BuilderState::Open(OpenRange {
            section_type: hit.section_type.clone(),
            start: page,
            confidence: hit.confidence,
            header: hit.header.clone(),
        });
        if let BuilderState::Open(previous) = std::mem::replace(&mut self.state, next) {
            self.ranges.push(previous.close(page - 1));
        }
    }

    /// Close any open range at the last page seen and return the candidates
    pub fn finish(mut self) -> Vec<SectionRange> {
        if let BuilderState::Open(open) = std::mem::replace(&mut self.state, BuilderState::Idle) {
            self.ranges.push(open.close(self.last_page));
        }
        self.ranges
    }
}

/// Build candidate ranges for a whole document (one observation per page)
pub fn build_sections(observations: &[PageObservation]) -> Vec<SectionRange> {
    let mut builder = SectionBuilder::new();
    for observation in observations {
        builder.push(observation);
    }
    builder.finish()
}
